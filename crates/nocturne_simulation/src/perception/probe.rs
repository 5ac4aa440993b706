//! Visibility probe — чистая оценка конуса зрения
//!
//! Порядок проверок на кандидата (дешёвое первым, short-circuit):
//! 1. squared-distance reject (без sqrt)
//! 2. angular reject (aim point = база цели + chest offset)
//! 3. occlusion ray (самое дорогое последним)
//!
//! Каждый кандидат классифицируется независимо — никакого early return
//! после первого найденного: в сцене два игрока, оба должны получить
//! корректный вердикт за один вызов.

use bevy::prelude::*;

use super::raycast::{ray_aabb, Aabb, Occluders};

/// Поза наблюдателя (позиция + forward, из Spotlight или собственного Transform)
#[derive(Debug, Clone, Copy)]
pub struct ObserverPose {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Конус обнаружения
#[derive(Debug, Clone, Copy)]
pub struct ConeShape {
    pub range: f32,
    pub half_angle_deg: f32,
}

/// Кандидат на обнаружение (snapshot позиции + объём коллайдера)
#[derive(Debug, Clone, Copy)]
pub struct ProbeCandidate {
    pub entity: Entity,
    pub base_position: Vec3,
    pub half_extents: Vec3,
}

/// Вердикт по одному кандидату (для debug overlay; решения не зависят)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayOutcome {
    Visible,
    Blocked,
    OutOfRange,
    OutOfCone,
}

/// Результат одного вызова probe
#[derive(Debug, Clone, Default)]
pub struct VisibilitySample {
    /// Кандидаты, прошедшие все три проверки
    pub visible: Vec<Entity>,
    /// Aim point последнего успешно обнаруженного кандидата
    pub last_hit: Option<Vec3>,
    /// Классификация каждого кандидата (порядок входного слайса)
    pub outcomes: Vec<(Entity, RayOutcome)>,
}

impl VisibilitySample {
    pub fn any_visible(&self) -> bool {
        !self.visible.is_empty()
    }

    pub fn first_visible(&self) -> Option<Entity> {
        self.visible.first().copied()
    }

    pub fn is_visible(&self, entity: Entity) -> bool {
        self.visible.contains(&entity)
    }
}

/// Оценить видимость всех кандидатов из позы наблюдателя
///
/// Malformed конус (range <= 0) или вырожденный forward — нулевая
/// видимость, не ошибка. Пустой слайс кандидатов — пустой sample.
pub fn evaluate(
    pose: ObserverPose,
    shape: ConeShape,
    chest_offset: f32,
    candidates: &[ProbeCandidate],
    occluders: &Occluders,
) -> VisibilitySample {
    let mut sample = VisibilitySample::default();
    if candidates.is_empty() {
        return sample;
    }

    let forward_sq = pose.forward.length_squared();
    if shape.range <= 0.0 || forward_sq < 1e-8 {
        for c in candidates {
            sample.outcomes.push((c.entity, RayOutcome::OutOfRange));
        }
        return sample;
    }
    let forward = pose.forward / forward_sq.sqrt();
    let sqr_range = shape.range * shape.range;

    for candidate in candidates {
        let aim = candidate.base_position + Vec3::Y * chest_offset;
        let to_candidate = aim - pose.position;

        // 1. Distance check (sqrMagnitude, без sqrt)
        let sqr_distance = to_candidate.length_squared();
        if sqr_distance > sqr_range {
            sample.outcomes.push((candidate.entity, RayOutcome::OutOfRange));
            continue;
        }
        // Кандидат в упор — направление вырождено, считаем невидимым
        if sqr_distance < 1e-6 {
            sample.outcomes.push((candidate.entity, RayOutcome::OutOfCone));
            continue;
        }

        // 2. Angle check
        let distance = sqr_distance.sqrt();
        let direction = to_candidate / distance;
        let angle_deg = forward.angle_between(direction).to_degrees();
        if angle_deg > shape.half_angle_deg {
            sample.outcomes.push((candidate.entity, RayOutcome::OutOfCone));
            continue;
        }

        // 3. Occlusion ray, ограничен фактической дистанцией.
        // Видимость только если ПЕРВАЯ поверхность на луче — сам кандидат:
        // стена или чужой коллайдер ближе — кандидат заслонён.
        let own_box = Aabb::new(
            candidate.base_position + Vec3::Y * candidate.half_extents.y,
            candidate.half_extents,
        );
        let own_t = ray_aabb(pose.position, direction, distance, &own_box).unwrap_or(distance);

        let mut blocker_t = occluders.nearest_hit(pose.position, direction, distance);
        for other in candidates {
            if other.entity == candidate.entity {
                continue;
            }
            let other_box = Aabb::new(
                other.base_position + Vec3::Y * other.half_extents.y,
                other.half_extents,
            );
            if let Some(t) = ray_aabb(pose.position, direction, distance, &other_box) {
                blocker_t = Some(blocker_t.map_or(t, |b: f32| b.min(t)));
            }
        }

        match blocker_t {
            Some(t) if t < own_t - 1e-4 => {
                sample.outcomes.push((candidate.entity, RayOutcome::Blocked));
            }
            _ => {
                sample.visible.push(candidate.entity);
                sample.last_hit = Some(aim);
                sample.outcomes.push((candidate.entity, RayOutcome::Visible));
            }
        }
    }

    sample
}

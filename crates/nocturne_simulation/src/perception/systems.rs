//! Perception системы: throttled LOS polling + awareness integration

use bevy::prelude::*;

use crate::ai::EnemyState;
use crate::components::{ColliderVolume, Observer, PerceptionConfig, Spotlight, Target};

use super::awareness::{Awareness, AwarenessCrossed};
use super::probe::{self, ConeShape, ObserverPose, ProbeCandidate, VisibilitySample};
use super::raycast::Occluders;

/// Мутабельное состояние перцепции наблюдателя
///
/// `cached_target` — non-owning ссылка на последнюю обнаруженную цель;
/// может протухнуть (despawn) — перепроверяется через Query::get перед
/// каждым использованием, никогда не разыменовывается вслепую.
#[derive(Component, Debug, Clone, Default)]
pub struct PerceptionState {
    /// Секунды до следующей LOS проверки
    pub next_check: f32,
    /// Последний probe sample (level-сигнал между проверками)
    pub sample: VisibilitySample,
    /// Кто-то из целей видим (по последнему sample)
    pub target_visible: bool,
    pub cached_target: Option<Entity>,
    pub last_known_position: Option<Vec3>,
    /// Счётчик проверок (диагностика cadence)
    pub checks_total: u32,
    /// Однократное предупреждение о протухшем Spotlight
    pub spotlight_warned: bool,
}

/// Система: throttled LOS проверка
///
/// Probe дорогой (occlusion лучи) — гоняем не каждый тик, а по интервалу.
/// Во время Chase интервал короче: latency потери цели важнее цены.
/// Между проверками sample держится как level-сигнал для awareness.
pub fn poll_visibility(
    time: Res<Time<Fixed>>,
    occluders: Res<Occluders>,
    mut observers: Query<(
        Entity,
        &Observer,
        &Transform,
        &PerceptionConfig,
        &mut PerceptionState,
        Option<&EnemyState>,
    )>,
    spotlights: Query<(&Spotlight, &Transform)>,
    targets: Query<(Entity, &Transform, &ColliderVolume), With<Target>>,
) {
    let delta = time.delta_secs();

    let candidates: Vec<ProbeCandidate> = targets
        .iter()
        .map(|(entity, transform, volume)| ProbeCandidate {
            entity,
            base_position: transform.translation,
            half_extents: volume.half_extents,
        })
        .collect();

    for (entity, observer, transform, config, mut state, enemy_state) in observers.iter_mut() {
        state.next_check -= delta;
        if state.next_check > 0.0 {
            continue;
        }

        let chasing = matches!(enemy_state, Some(EnemyState::Chase));
        state.next_check = if chasing {
            config.chase_check_interval
        } else {
            config.check_interval
        };
        state.checks_total += 1;

        // Spotlight collaborator: range/угол/поза из него; протухшая ссылка
        // деградирует до ручного конфига + собственного Transform
        let (pose, shape) = match observer.spotlight.and_then(|s| spotlights.get(s).ok()) {
            Some((spotlight, light_transform)) => (
                ObserverPose {
                    position: light_transform.translation,
                    forward: light_transform.forward().as_vec3(),
                },
                ConeShape {
                    range: spotlight.range,
                    half_angle_deg: spotlight.half_angle_deg,
                },
            ),
            None => {
                if observer.spotlight.is_some() && !state.spotlight_warned {
                    state.spotlight_warned = true;
                    crate::logger::log_warning(&format!(
                        "Observer {:?}: spotlight reference is dead, falling back to PerceptionConfig",
                        entity
                    ));
                }
                (
                    ObserverPose {
                        position: transform.translation,
                        forward: transform.forward().as_vec3(),
                    },
                    ConeShape {
                        range: config.range,
                        half_angle_deg: config.half_angle_deg,
                    },
                )
            }
        };

        let sample = probe::evaluate(pose, shape, config.chest_offset, &candidates, &occluders);

        state.target_visible = sample.any_visible();
        if let Some(target) = sample.first_visible() {
            // Cache обновляется только при успешном обнаружении —
            // протухание обрабатывает потребитель через liveness check
            state.cached_target = Some(target);
            // last_hit — chest height; для навигации нужна база
            state.last_known_position = sample.last_hit.map(|p| p - Vec3::Y * config.chest_offset);
        }
        state.sample = sample;
    }
}

/// Система: awareness integration, каждый тик
///
/// Работает по последнему sample независимо от cadence LOS проверок —
/// частота probe не влияет на гладкость накопления.
pub fn update_awareness(
    time: Res<Time<Fixed>>,
    mut observers: Query<(Entity, &PerceptionState, &mut Awareness)>,
    mut crossings: EventWriter<AwarenessCrossed>,
) {
    let delta = time.delta_secs();

    for (entity, state, mut awareness) in observers.iter_mut() {
        if awareness.tick(state.target_visible, delta) {
            crossings.write(AwarenessCrossed { observer: entity });
        }
    }
}

//! Ray-vs-AABB запросы по статической геометрии уровня
//!
//! Физический движок вне scope — потребляем только результат запроса
//! (ближайшее пересечение луча), поэтому slab-тест руками.

use bevy::prelude::*;

/// AABB occluder (стена, колонна)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }
}

/// Статическая occlusion-геометрия уровня
///
/// Read-only для систем перцепции (заполняется при setup сцены).
#[derive(Resource, Debug, Clone, Default)]
pub struct Occluders {
    pub boxes: Vec<Aabb>,
}

impl Occluders {
    /// Ближайшее пересечение луча с occluder'ами, в пределах max_dist
    pub fn nearest_hit(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<f32> {
        self.boxes
            .iter()
            .filter_map(|b| ray_aabb(origin, dir, max_dist, b))
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Slab-тест: расстояние до входа луча в AABB
///
/// `dir` должен быть нормализован. Возвращает None если пересечения нет
/// в интервале [0, max_dist]. Луч изнутри бокса даёт t = 0.
pub fn ray_aabb(origin: Vec3, dir: Vec3, max_dist: f32, aabb: &Aabb) -> Option<f32> {
    let mut t_min = 0.0f32;
    let mut t_max = max_dist;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let lo = aabb.center[axis] - aabb.half_extents[axis];
        let hi = aabb.center[axis] + aabb.half_extents[axis];

        if d.abs() < 1e-8 {
            // Луч параллелен slab'у — мимо, если origin вне интервала
            if o < lo || o > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
    }

    Some(t_min)
}

//! Компоненты целей: Target marker + ColliderVolume

use bevy::prelude::*;

/// Цель перцепции (игрок) — любой наблюдатель может её обнаружить
///
/// Наблюдатели НЕ владеют целями: они держат Option<Entity> и
/// перепроверяют liveness через Query::get перед каждым использованием.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(ColliderVolume)]
pub struct Target;

/// Объём коллайдера цели (AABB half-extents вокруг Transform)
///
/// Участвует в occlusion-тесте: луч должен попасть именно в этот объём
/// первым, иначе цель считается заслонённой.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ColliderVolume {
    pub half_extents: Vec3,
}

impl Default for ColliderVolume {
    fn default() -> Self {
        Self {
            // Капсула игрока аппроксимирована боксом 0.8 x 1.8 x 0.8
            half_extents: Vec3::new(0.4, 0.9, 0.4),
        }
    }
}

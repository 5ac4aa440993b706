//! Lock-on — накопительный захват цели стационарного наблюдателя
//!
//! Набор медленнее слива (20 против 30 в секунду): прерывистая видимость
//! не даёт захвата. Сброс захвата асимметричный: locked держится пока
//! метр не опустился ровно до нуля, короткий разрыв LOS захват не снимает.

use bevy::prelude::*;

use crate::components::Target;
use crate::perception::PerceptionState;

use super::events::EnemySignal;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LockOn {
    pub value: f32,
    pub max: f32,
    /// Набор в секунду при видимой цели
    pub fill_rate: f32,
    /// Слив в секунду без цели
    pub drain_rate: f32,
    /// Slerp-фактор доворота к захваченной цели
    pub rotation_speed: f32,
    pub locked: bool,
    /// Цель захвата; проверяется на liveness перед каждым использованием
    pub target: Option<Entity>,
}

impl Default for LockOn {
    fn default() -> Self {
        Self {
            value: 0.0,
            max: 100.0,
            fill_rate: 20.0,
            drain_rate: 30.0,
            rotation_speed: 0.5,
            locked: false,
            target: None,
        }
    }
}

impl LockOn {
    /// Тик набора; true ровно в момент достижения максимума
    pub fn tick_fill(&mut self, delta: f32) -> bool {
        self.value = (self.value + self.fill_rate * delta).min(self.max);
        if self.value >= self.max && !self.locked {
            self.locked = true;
            return true;
        }
        false
    }

    /// Тик слива. Захват снимается только на нуле.
    pub fn tick_drain(&mut self, delta: f32) {
        self.value = (self.value - self.drain_rate * delta).max(0.0);
        if self.value <= 0.0 && self.locked {
            self.locked = false;
            self.target = None;
        }
    }
}

/// Система: набор/слив lock-on метра + доворот к захваченной цели
pub fn lockon_update(
    time: Res<Time<Fixed>>,
    mut signals: EventWriter<EnemySignal>,
    mut observers: Query<(Entity, &mut LockOn, &PerceptionState, &mut Transform)>,
    targets: Query<&Transform, (With<Target>, Without<LockOn>)>,
) {
    let delta = time.delta_secs();

    for (entity, mut lockon, perception, mut transform) in observers.iter_mut() {
        // Цель метра — закешированная; протухла — метр сливается
        let live_target = perception
            .cached_target
            .filter(|t| targets.contains(*t));

        if perception.target_visible && live_target.is_some() {
            lockon.target = live_target;
            if lockon.tick_fill(delta) {
                if let Some(target) = lockon.target {
                    signals.write(EnemySignal::LockedOn {
                        observer: entity,
                        target,
                    });
                    crate::logger::log(&format!("LockOn {:?}: captured {:?}", entity, target));
                }
            }
        } else {
            lockon.tick_drain(delta);
        }

        // Пока захвачены — корпус следит за целью даже без LOS
        if lockon.locked {
            if let Some(target_transform) = lockon.target.and_then(|t| targets.get(t).ok()) {
                let mut direction = target_transform.translation - transform.translation;
                direction.y = 0.0;
                if direction.length_squared() > 1e-4 {
                    let desired = Transform::from_translation(transform.translation)
                        .looking_to(direction, Vec3::Y)
                        .rotation;
                    let t = (lockon.rotation_speed * delta).min(1.0);
                    transform.rotation = transform.rotation.slerp(desired, t);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_locks_once_at_max() {
        let mut lockon = LockOn::default();
        let mut lock_events = 0;
        // 100 / (20 * 0.1) = 50 тиков до максимума
        for _ in 0..80 {
            if lockon.tick_fill(0.1) {
                lock_events += 1;
            }
        }
        assert!(lockon.locked);
        assert_eq!(lockon.value, lockon.max);
        assert_eq!(lock_events, 1);
    }

    #[test]
    fn test_partial_drain_keeps_lock() {
        let mut lockon = LockOn::default();
        while !lockon.tick_fill(0.1) {}
        lockon.target = Some(Entity::from_raw(7));

        // Сливаем почти до нуля — захват держится
        while lockon.value > 1.0 {
            lockon.tick_drain(0.1);
        }
        assert!(lockon.locked);
        assert!(lockon.target.is_some());
    }

    #[test]
    fn test_drain_to_zero_unlocks() {
        let mut lockon = LockOn::default();
        while !lockon.tick_fill(0.1) {}
        lockon.target = Some(Entity::from_raw(7));

        for _ in 0..100 {
            lockon.tick_drain(0.1);
        }
        assert_eq!(lockon.value, 0.0);
        assert!(!lockon.locked);
        assert!(lockon.target.is_none());
    }

    #[test]
    fn test_intermittent_visibility_never_locks() {
        // Слив быстрее набора: 1 тик виден / 1 тик нет — метр не растёт
        let mut lockon = LockOn::default();
        for _ in 0..200 {
            lockon.tick_fill(0.05);
            lockon.tick_drain(0.05);
        }
        assert!(!lockon.locked);
        assert!(lockon.value < lockon.max * 0.5);
    }
}

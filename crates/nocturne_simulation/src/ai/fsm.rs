//! FSM противника: состояния с payload, профиль поведения, маршрут патруля

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Состояние противника
///
/// Payload живёт прямо в состоянии: у Patrol свой таймер ожидания, у
/// Investigate свой countdown. Переход = замена значения, мусорных
/// полей "на всякий случай" в компоненте нет.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Стоит на месте, только наблюдает
    Idle,
    /// Обход маршрута с паузой на точках
    Patrol {
        waypoint: usize,
        wait_timer: f32,
        waiting: bool,
    },
    /// Активное преследование видимой цели
    Chase,
    /// Идём к последней известной позиции, ждём, сдаёмся по таймеру
    Investigate { countdown: f32 },
    /// Бегство от источника света
    Flee { timer: f32 },
}

impl Default for EnemyState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Стартовое состояние: есть маршрут — патрулируем, нет — стоим
pub fn initial_state(route: Option<&PatrolRoute>) -> EnemyState {
    match route {
        Some(route) if !route.waypoints.is_empty() => EnemyState::Patrol {
            waypoint: 0,
            wait_timer: 0.0,
            waiting: false,
        },
        _ => EnemyState::Idle,
    }
}

/// Реакция на попадание под свет лампы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum LightReaction {
    /// Убегает от источника
    Flee,
    /// Переходит в Chase на закешированную цель
    Aggress,
    /// Игнорирует (сигнал наружу всё равно уходит)
    #[default]
    Neutral,
}

/// Профиль поведения — data-driven вариации без новых типов противников
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct BehaviorProfile {
    /// false — пассивный наблюдатель: awareness копится, событие
    /// пересечения уходит, но состояние не меняется
    pub alerts_on_threshold: bool,
    pub light_reaction: LightReaction,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            alerts_on_threshold: true,
            light_reaction: LightReaction::Neutral,
        }
    }
}

/// Замкнутый маршрут патруля (мировые координаты)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    /// Ближайшая точка маршрута к позиции (для возврата после Investigate)
    pub fn nearest_waypoint(&self, position: Vec3) -> usize {
        let mut best = 0;
        let mut best_sq = f32::MAX;
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            let sq = waypoint.distance_squared(position);
            if sq < best_sq {
                best_sq = sq;
                best = i;
            }
        }
        best
    }

    /// Следующий индекс по кольцу
    pub fn next_index(&self, current: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (current + 1) % self.waypoints.len()
        }
    }
}

/// Числовые параметры поведения (скорости, таймауты, дистанции)
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct EnemyConfig {
    /// Дистанция "дошёл до точки"
    pub reach_distance: f32,
    /// Пауза на точке маршрута (сек)
    pub waypoint_wait_time: f32,
    /// Фактор доворота к следующей точке во время паузы
    pub patrol_turn_rate: f32,
    /// Скорость поворота в Chase (градусы/с)
    pub chase_turn_rate: f32,
    /// Сколько ждать на последней известной позиции (сек)
    pub investigation_duration: f32,
    pub flee_speed: f32,
    /// Как далеко за раз отбегаем от угрозы
    pub flee_distance: f32,
    /// Угроза дальше — бегство можно прекращать
    pub flee_range: f32,
    pub flee_duration: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            reach_distance: 0.5,
            waypoint_wait_time: 2.0,
            patrol_turn_rate: 5.0,
            chase_turn_rate: 360.0,
            investigation_duration: 5.0,
            flee_speed: 4.0,
            flee_distance: 8.0,
            flee_range: 15.0,
            flee_duration: 6.0,
        }
    }
}

/// Подчинённые лидера группы (каскад команд при Caught)
#[derive(Component, Debug, Clone, Default)]
pub struct Subordinates(pub Vec<Entity>);

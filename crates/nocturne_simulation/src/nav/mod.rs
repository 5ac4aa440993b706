//! Navigation collaborator — поверхность контракта NavMesh-агента
//!
//! Ядро трогает только контракт: set_destination, remaining_distance,
//! path_pending, turn rate (override + restore). Само движение — прямая
//! интеграция к точке в FixedUpdate; полноценный pathfinding живёт на
//! стороне хоста и вне scope симуляции.

use bevy::prelude::*;

/// Порог перестройки пути: цель сдвинулась дальше — считаем путь заново
const REPATH_DISTANCE_SQ: f32 = 4.0;

/// Агент навигации
///
/// `default_*` хранятся для восстановления после state-specific override
/// (Chase поднимает angular_speed, Flee поднимает speed).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Остаток дистанции до destination (по прямой, обновляется каждый тик)
    pub remaining_distance: f32,
    /// true пока "путь считается" (один тик после нового destination)
    pub path_pending: bool,
    /// Линейная скорость (м/с)
    pub speed: f32,
    pub default_speed: f32,
    /// Скорость поворота (градусы/с)
    pub angular_speed: f32,
    pub default_angular_speed: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(2.0, 120.0)
    }
}

impl NavAgent {
    pub fn new(speed: f32, angular_speed: f32) -> Self {
        Self {
            destination: None,
            remaining_distance: 0.0,
            path_pending: false,
            speed,
            default_speed: speed,
            angular_speed,
            default_angular_speed: angular_speed,
        }
    }

    /// Новая цель. Небольшая коррекция (преследование движущейся цели)
    /// не сбрасывает путь — иначе агент "считал бы путь" каждый тик и
    /// никогда не двигался.
    pub fn set_destination(&mut self, destination: Vec3) {
        match self.destination {
            Some(current) if current.distance_squared(destination) < 1e-4 => {}
            Some(current) if current.distance_squared(destination) < REPATH_DISTANCE_SQ => {
                self.destination = Some(destination);
            }
            _ => {
                self.destination = Some(destination);
                self.path_pending = true;
            }
        }
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
    }

    /// Прибыли: путь готов и остаток в пределах reach
    pub fn arrived(&self, reach_distance: f32) -> bool {
        self.destination.is_some() && !self.path_pending && self.remaining_distance <= reach_distance
    }

    pub fn restore_turn_rate(&mut self) {
        self.angular_speed = self.default_angular_speed;
    }

    pub fn restore_speed(&mut self) {
        self.speed = self.default_speed;
    }
}

/// Повернуть transform к направлению, не больше max_radians за вызов
///
/// Вырожденное направление — no-op (никаких NaN в rotation).
pub fn rotate_towards(transform: &mut Transform, direction: Vec3, max_radians: f32) {
    let mut flat = direction;
    flat.y = 0.0;
    if flat.length_squared() < 1e-4 {
        return;
    }
    let target = Transform::from_translation(transform.translation)
        .looking_to(flat, Vec3::Y)
        .rotation;
    let angle = transform.rotation.angle_between(target);
    if angle < 1e-4 {
        transform.rotation = target;
        return;
    }
    let t = (max_radians / angle).min(1.0);
    transform.rotation = transform.rotation.slerp(target, t);
}

/// Система: интеграция движения агента
///
/// path_pending съедает один тик (имитация расчёта пути), дальше —
/// прямолинейный шаг speed*dt с поворотом корпуса к курсу.
pub fn nav_agent_move(time: Res<Time<Fixed>>, mut agents: Query<(&mut NavAgent, &mut Transform)>) {
    let delta = time.delta_secs();

    for (mut agent, mut transform) in agents.iter_mut() {
        let Some(destination) = agent.destination else {
            agent.remaining_distance = 0.0;
            continue;
        };

        let to_destination = destination - transform.translation;
        let distance = to_destination.length();

        if agent.path_pending {
            agent.path_pending = false;
            agent.remaining_distance = distance;
            continue;
        }

        let step = agent.speed * delta;
        if distance <= step {
            transform.translation = destination;
            agent.remaining_distance = 0.0;
        } else {
            let direction = to_destination / distance;
            transform.translation += direction * step;
            agent.remaining_distance = distance - step;
            rotate_towards(
                &mut transform,
                direction,
                (agent.angular_speed * delta).to_radians(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repath_only_on_large_change() {
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::new(10.0, 0.0, 0.0));
        assert!(agent.path_pending);

        agent.path_pending = false;
        // Коррекция меньше порога — путь не сбрасывается
        agent.set_destination(Vec3::new(10.5, 0.0, 0.0));
        assert!(!agent.path_pending);
        // Скачок дальше порога — repath
        agent.set_destination(Vec3::new(20.0, 0.0, 0.0));
        assert!(agent.path_pending);
    }

    #[test]
    fn test_arrived_requires_path_ready() {
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::ZERO);
        agent.remaining_distance = 0.0;
        assert!(!agent.arrived(0.5), "path_pending должен блокировать arrival");
        agent.path_pending = false;
        assert!(agent.arrived(0.5));
    }

    #[test]
    fn test_restore_defaults() {
        let mut agent = NavAgent::new(2.0, 120.0);
        agent.angular_speed = 360.0;
        agent.speed = 4.0;
        agent.restore_turn_rate();
        agent.restore_speed();
        assert_eq!(agent.angular_speed, 120.0);
        assert_eq!(agent.speed, 2.0);
    }

    #[test]
    fn test_rotate_towards_degenerate_direction_is_noop() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        let before = transform.rotation;
        rotate_towards(&mut transform, Vec3::ZERO, 1.0);
        assert_eq!(transform.rotation, before);
        assert!(!transform.rotation.x.is_nan());
    }
}

//! Tests for FSM data types (route helpers, initial state, config defaults).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::fsm::{initial_state, EnemyConfig, EnemyState, PatrolRoute};

    #[test]
    fn test_nearest_waypoint() {
        let route = PatrolRoute {
            waypoints: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
            ],
        };
        assert_eq!(route.nearest_waypoint(Vec3::new(1.0, 0.0, 1.0)), 0);
        assert_eq!(route.nearest_waypoint(Vec3::new(9.0, 0.0, 8.0)), 2);
    }

    #[test]
    fn test_next_index_wraps() {
        let route = PatrolRoute {
            waypoints: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
        };
        assert_eq!(route.next_index(0), 1);
        assert_eq!(route.next_index(2), 0);
    }

    #[test]
    fn test_initial_state_with_route_is_patrol() {
        let route = PatrolRoute {
            waypoints: vec![Vec3::ZERO, Vec3::X],
        };
        assert!(matches!(
            initial_state(Some(&route)),
            EnemyState::Patrol { waypoint: 0, .. }
        ));
    }

    #[test]
    fn test_initial_state_without_route_is_idle() {
        assert_eq!(initial_state(None), EnemyState::Idle);
        let empty = PatrolRoute::default();
        assert_eq!(initial_state(Some(&empty)), EnemyState::Idle);
    }

    #[test]
    fn test_config_defaults() {
        let config = EnemyConfig::default();
        assert_eq!(config.reach_distance, 0.5);
        assert_eq!(config.waypoint_wait_time, 2.0);
        assert_eq!(config.investigation_duration, 5.0);
        assert!(config.flee_range > config.flee_distance);
    }
}

//! Per-state поведение: куда идти и куда смотреть в текущем состоянии
//!
//! Переходов здесь нет — только работа внутри состояния. Противник без
//! NavAgent все mobile-ветки пропускает.

use bevy::prelude::*;

use crate::components::Target;
use crate::nav::NavAgent;
use crate::perception::PerceptionState;

use super::super::fsm::{EnemyConfig, EnemyState, PatrolRoute};

/// Система: поведение текущего состояния
pub fn enemy_movement_from_state(
    time: Res<Time<Fixed>>,
    mut enemies: Query<(
        &EnemyState,
        &EnemyConfig,
        &mut PerceptionState,
        &mut Transform,
        Option<&mut NavAgent>,
        Option<&PatrolRoute>,
    )>,
    targets: Query<&Transform, (With<Target>, Without<EnemyState>)>,
) {
    let delta = time.delta_secs();

    for (state, config, mut perception, mut transform, agent, route) in enemies.iter_mut() {
        let mut agent = agent;

        match state {
            EnemyState::Idle => {}

            EnemyState::Patrol {
                waypoint, waiting, ..
            } => {
                let (Some(agent), Some(route)) = (agent.as_deref_mut(), route) else {
                    continue;
                };
                if route.waypoints.is_empty() {
                    continue;
                }

                if *waiting {
                    // Во время паузы плавно доворачиваемся к следующей точке
                    let next = route.waypoints[route.next_index(*waypoint)];
                    let direction = next - transform.translation;
                    face_towards(
                        &mut transform,
                        direction,
                        (config.patrol_turn_rate * delta).min(1.0),
                    );
                } else {
                    let index = (*waypoint).min(route.waypoints.len() - 1);
                    agent.set_destination(route.waypoints[index]);
                }
            }

            EnemyState::Chase => {
                // Преследуем живую позицию цели; протухла — едем по
                // последней известной, transitions разберётся дальше
                if let Some(target_transform) = perception
                    .cached_target
                    .and_then(|t| targets.get(t).ok())
                {
                    perception.last_known_position = Some(target_transform.translation);
                    if let Some(agent) = agent.as_deref_mut() {
                        agent.set_destination(target_transform.translation);
                    }
                }
            }

            EnemyState::Investigate { .. } => {
                // Destination выставлен при входе, агент сам доедет
            }

            EnemyState::Flee { .. } => {
                let Some(agent) = agent.as_deref_mut() else {
                    continue;
                };
                agent.speed = config.flee_speed;

                if agent.destination.is_none() || agent.arrived(config.reach_distance) {
                    let threat = perception
                        .cached_target
                        .and_then(|t| targets.get(t).ok())
                        .map(|t| t.translation)
                        .or(perception.last_known_position);

                    let mut away = match threat {
                        Some(position) => transform.translation - position,
                        None => transform.forward().as_vec3(),
                    };
                    away.y = 0.0;
                    if away.length_squared() < 1e-4 {
                        away = transform.forward().as_vec3();
                        away.y = 0.0;
                    }
                    if away.length_squared() > 1e-4 {
                        let flee_point =
                            transform.translation + away.normalize() * config.flee_distance;
                        agent.set_destination(flee_point);
                    }
                }
            }
        }
    }
}

/// Плавный доворот: slerp с фактором за тик, вырожденное направление — no-op
fn face_towards(transform: &mut Transform, direction: Vec3, factor: f32) {
    let mut flat = direction;
    flat.y = 0.0;
    if flat.length_squared() < 1e-3 {
        return;
    }
    let desired = Transform::from_translation(transform.translation)
        .looking_to(flat, Vec3::Y)
        .rotation;
    transform.rotation = transform.rotation.slerp(desired, factor.min(1.0));
}

//! Переходы FSM — единственное место, где EnemyState меняется
//!
//! Системы chained: AwarenessCrossed из этого же тика уже в ридере,
//! переход происходит без задержки на кадр.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::components::Target;
use crate::logger::log;
use crate::nav::NavAgent;
use crate::perception::{Awareness, AwarenessCrossed, PerceptionState};

use super::super::events::EnemySignal;
use super::super::fsm::{BehaviorProfile, EnemyConfig, EnemyState, PatrolRoute};

/// Система: переходы между состояниями противника
///
/// Приоритет: пересечение порога > потеря цели > таймеры. Противник без
/// NavAgent (стационарный наблюдатель) получает сигналы, но в mobile
/// состояния не переходит — отсутствие коллаборатора отключает только
/// зависящее от него поведение.
pub fn enemy_fsm_transitions(
    time: Res<Time<Fixed>>,
    mut crossings: EventReader<AwarenessCrossed>,
    mut signals: EventWriter<EnemySignal>,
    mut enemies: Query<(
        Entity,
        &mut EnemyState,
        &mut Awareness,
        &BehaviorProfile,
        &EnemyConfig,
        &PerceptionState,
        &Transform,
        Option<&mut NavAgent>,
        Option<&PatrolRoute>,
    )>,
    targets: Query<&Transform, (With<Target>, Without<EnemyState>)>,
) {
    let delta = time.delta_secs();
    let crossed: HashSet<Entity> = crossings.read().map(|c| c.observer).collect();

    for (entity, mut state, mut awareness, profile, config, perception, transform, agent, route) in
        enemies.iter_mut()
    {
        let mut agent = agent;

        match &mut *state {
            EnemyState::Idle | EnemyState::Patrol { .. } => {
                if crossed.contains(&entity) && profile.alerts_on_threshold {
                    signals.write(EnemySignal::Spotted {
                        observer: entity,
                        target: perception.cached_target,
                    });

                    match agent.as_deref_mut() {
                        Some(agent) if perception.target_visible => {
                            agent.angular_speed = config.chase_turn_rate;
                            log(&format!("Enemy {:?}: spotted target, chasing", entity));
                            *state = EnemyState::Chase;
                            continue;
                        }
                        Some(agent) => {
                            if let Some(last_known) = perception.last_known_position {
                                agent.set_destination(last_known);
                            }
                            log(&format!("Enemy {:?}: alerted, investigating", entity));
                            *state = EnemyState::Investigate {
                                countdown: config.investigation_duration,
                            };
                            continue;
                        }
                        None => {
                            // Стационарный: сигнал ушёл, состояние на месте
                            log(&format!("Enemy {:?}: alerted (stationary)", entity));
                        }
                    }
                }

                // Patrol bookkeeping: пауза на точке, затем следующая
                if let (
                    EnemyState::Patrol {
                        waypoint,
                        wait_timer,
                        waiting,
                    },
                    Some(agent),
                    Some(route),
                ) = (&mut *state, agent.as_deref_mut(), route)
                {
                    if *waiting {
                        *wait_timer -= delta;
                        if *wait_timer <= 0.0 {
                            *waiting = false;
                            *waypoint = route.next_index(*waypoint);
                        }
                    } else if agent.arrived(config.reach_distance) {
                        *waiting = true;
                        *wait_timer = config.waypoint_wait_time;
                        agent.clear_destination();
                    }
                }
            }

            EnemyState::Chase => {
                if !perception.target_visible {
                    if let Some(agent) = agent.as_deref_mut() {
                        agent.restore_turn_rate();
                        if let Some(last_known) = perception.last_known_position {
                            agent.set_destination(last_known);
                        }
                    }
                    log(&format!("Enemy {:?}: lost target, investigating", entity));
                    *state = EnemyState::Investigate {
                        countdown: config.investigation_duration,
                    };
                }
            }

            EnemyState::Investigate { countdown } => {
                if perception.target_visible {
                    if let Some(agent) = agent.as_deref_mut() {
                        agent.angular_speed = config.chase_turn_rate;
                    }
                    log(&format!("Enemy {:?}: reacquired target, chasing", entity));
                    *state = EnemyState::Chase;
                    continue;
                }

                // Таймер тикает только на месте: сначала дойти, потом ждать
                let on_site = match agent.as_deref() {
                    Some(agent) => agent.destination.is_none() || agent.arrived(config.reach_distance),
                    None => true,
                };
                if on_site {
                    *countdown -= delta;
                    if *countdown <= 0.0 {
                        awareness.reset();
                        if let Some(agent) = agent.as_deref_mut() {
                            agent.restore_turn_rate();
                            agent.clear_destination();
                        }
                        log(&format!("Enemy {:?}: giving up search", entity));
                        *state = resume_state(route, transform.translation);
                    }
                }
            }

            EnemyState::Flee { timer } => {
                *timer -= delta;

                let threat_far = perception
                    .cached_target
                    .and_then(|t| targets.get(t).ok())
                    .map(|threat| {
                        threat.translation.distance_squared(transform.translation)
                            > config.flee_range * config.flee_range
                    })
                    .unwrap_or(false);

                if *timer <= 0.0 || threat_far {
                    if let Some(agent) = agent.as_deref_mut() {
                        agent.restore_speed();
                        agent.clear_destination();
                    }
                    log(&format!("Enemy {:?}: flee over, resuming", entity));
                    *state = resume_state(route, transform.translation);
                }
            }
        }
    }
}

/// Куда возвращаться после Investigate/Flee: на маршрут с ближайшей точки
/// или в Idle
fn resume_state(route: Option<&PatrolRoute>, position: Vec3) -> EnemyState {
    match route {
        Some(route) if !route.waypoints.is_empty() => EnemyState::Patrol {
            waypoint: route.nearest_waypoint(position),
            wait_timer: 0.0,
            waiting: false,
        },
        _ => EnemyState::Idle,
    }
}

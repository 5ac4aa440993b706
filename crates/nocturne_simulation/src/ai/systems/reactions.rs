//! Реакции на световые стимулы + каскад групповых команд

use bevy::prelude::*;

use crate::components::Target;
use crate::logger::log;
use crate::nav::NavAgent;
use crate::perception::PerceptionState;

use super::super::events::{CommandKind, EnemySignal, GroupCommand, LightStimulus};
use super::super::fsm::{BehaviorProfile, EnemyConfig, EnemyState, LightReaction, Subordinates};

/// Система: обработка световых стимулов
///
/// Сигнал наружу уходит всегда; смена состояния — по профилю. Caught на
/// лидере раздаёт Scatter подчинённым, их состояния меняет
/// apply_group_commands в этом же тике (системы chained).
pub fn react_to_light(
    mut stimuli: EventReader<LightStimulus>,
    mut signals: EventWriter<EnemySignal>,
    mut group_commands: EventWriter<GroupCommand>,
    mut enemies: Query<(
        &mut EnemyState,
        &BehaviorProfile,
        &EnemyConfig,
        &PerceptionState,
        &Transform,
        Option<&mut NavAgent>,
    )>,
    leaders: Query<&Subordinates>,
    targets: Query<(), With<Target>>,
) {
    for stimulus in stimuli.read() {
        match *stimulus {
            LightStimulus::Lit { enemy, source } => {
                signals.write(EnemySignal::Lit { observer: enemy });

                let Ok((mut state, profile, config, perception, transform, agent)) =
                    enemies.get_mut(enemy)
                else {
                    continue;
                };
                let mut agent = agent;

                match profile.light_reaction {
                    LightReaction::Flee => {
                        if let Some(agent) = agent.as_deref_mut() {
                            agent.speed = config.flee_speed;
                            let mut away = transform.translation - source;
                            away.y = 0.0;
                            if away.length_squared() > 1e-4 {
                                agent.set_destination(
                                    transform.translation
                                        + away.normalize() * config.flee_distance,
                                );
                            }
                        }
                        log(&format!("Enemy {:?}: lit, fleeing", enemy));
                        *state = EnemyState::Flee {
                            timer: config.flee_duration,
                        };
                    }
                    LightReaction::Aggress => {
                        // Агрессия осмысленна только с живой целью
                        let has_live_target = perception
                            .cached_target
                            .is_some_and(|t| targets.contains(t));
                        if has_live_target {
                            if let Some(agent) = agent.as_deref_mut() {
                                agent.angular_speed = config.chase_turn_rate;
                            }
                            log(&format!("Enemy {:?}: lit, aggressing", enemy));
                            *state = EnemyState::Chase;
                        } else {
                            log(&format!("Enemy {:?}: lit, no target to aggress", enemy));
                        }
                    }
                    LightReaction::Neutral => {
                        log(&format!("Enemy {:?}: lit, ignoring", enemy));
                    }
                }
            }

            LightStimulus::Caught { leader } => {
                signals.write(EnemySignal::Caught { leader });

                let Ok(subordinates) = leaders.get(leader) else {
                    continue;
                };
                for &subordinate in &subordinates.0 {
                    group_commands.write(GroupCommand {
                        leader,
                        subordinate,
                        command: CommandKind::Scatter,
                    });
                }
            }
        }
    }
}

/// Система: подчинённые исполняют команды лидера
pub fn apply_group_commands(
    mut group_commands: EventReader<GroupCommand>,
    mut enemies: Query<(
        &mut EnemyState,
        &BehaviorProfile,
        &EnemyConfig,
        Option<&mut NavAgent>,
    )>,
) {
    for command in group_commands.read() {
        let Ok((mut state, profile, config, agent)) = enemies.get_mut(command.subordinate) else {
            continue;
        };
        let mut agent = agent;

        match command.command {
            CommandKind::Scatter => match profile.light_reaction {
                LightReaction::Flee => {
                    if let Some(agent) = agent.as_deref_mut() {
                        agent.speed = config.flee_speed;
                    }
                    log(&format!(
                        "Enemy {:?}: scatter from leader {:?}",
                        command.subordinate, command.leader
                    ));
                    *state = EnemyState::Flee {
                        timer: config.flee_duration,
                    };
                }
                _ => {
                    log(&format!(
                        "Enemy {:?}: ignoring scatter command",
                        command.subordinate
                    ));
                }
            },
        }
    }
}

//! AI module — FSM противников, реакции на свет, lock-on
//!
//! Архитектура: данные-в-состояниях (enum с payload), переходы в одном
//! месте (systems/fsm.rs), поведение per-state отдельно (systems/movement.rs).
//! Сигналы наружу — события, хост (рендер/аудио) подписывается сам.

pub mod events;
pub mod fsm;
pub mod lockon;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod fsm_tests;

pub use events::{CommandKind, EnemySignal, GroupCommand, LightStimulus};
pub use fsm::{
    initial_state, BehaviorProfile, EnemyConfig, EnemyState, LightReaction, PatrolRoute,
    Subordinates,
};
pub use lockon::{lockon_update, LockOn};
pub use systems::{
    apply_group_commands, enemy_fsm_transitions, enemy_movement_from_state, react_to_light,
};

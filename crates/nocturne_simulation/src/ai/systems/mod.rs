//! AI системы: переходы FSM, per-state поведение, реакции на стимулы

pub mod fsm;
pub mod movement;
pub mod reactions;

pub use fsm::enemy_fsm_transitions;
pub use movement::enemy_movement_from_state;
pub use reactions::{apply_group_commands, react_to_light};

//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - observer: перцепция врагов (Observer, Spotlight, PerceptionConfig)
//! - target: обнаруживаемые entity (Target, ColliderVolume)

pub mod observer;
pub mod target;

// Re-exports для удобного импорта
pub use observer::*;
pub use target::*;

//! Perception module — конус зрения, LOS occlusion, awareness integration
//!
//! Pipeline (порядок внутри тика гарантирован через SimSet):
//! 1. poll_visibility — throttled LOS проверка (чаще во время Chase)
//! 2. update_awareness — интеграция awareness каждый тик по последнему sample
//!
//! Probe — чистая функция: никаких side effects, debug классификация лучей
//! возвращается данными (RayOutcome), решения от неё не зависят.

pub mod awareness;
pub mod probe;
pub mod raycast;
pub mod systems;

pub use awareness::{Awareness, AwarenessCrossed};
pub use probe::{evaluate, ConeShape, ObserverPose, ProbeCandidate, RayOutcome, VisibilitySample};
pub use raycast::{ray_aabb, Aabb, Occluders};
pub use systems::{poll_visibility, update_awareness, PerceptionState};

//! Nocturne Simulation Core
//!
//! ECS-симуляция stealth-кооператива на Bevy 0.16 (headless).
//! Ядро — perception/FSM/lock-on/QTE; рендер, ввод и pathfinding живут
//! на стороне хоста и общаются с ядром через события и контракт NavAgent.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;
pub mod nav;
pub mod perception;
pub mod player;
pub mod qte;

// Re-export базовых типов для удобства
pub use ai::{
    initial_state, BehaviorProfile, CommandKind, EnemyConfig, EnemySignal, EnemyState,
    GroupCommand, LightReaction, LightStimulus, LockOn, PatrolRoute, Subordinates,
};
pub use components::*;
pub use components::Observer;
pub use logger::init_logger;
pub use nav::NavAgent;
pub use perception::{Awareness, AwarenessCrossed, Occluders, PerceptionState};
pub use player::{FaceButton, PlayerAction, PlayerActionEvent, PlayerIndex, PlayerLamp};
pub use qte::{QteComplete, QteOutcome, QteSession, QteStart};

/// Порядок подсистем внутри одного FixedUpdate тика
///
/// Chained: probe -> awareness -> переходы FSM -> поведение -> движение ->
/// реакции на свет -> QTE. Событие, записанное раньше по цепочке,
/// читается в том же тике.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Perception,
    Awareness,
    Decision,
    Behavior,
    Navigation,
    Reaction,
    Qte,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG: init_resource, чтобы не затирать seed,
            // выставленный create_headless_app до добавления плагина
            .init_resource::<DeterministicRng>()
            .init_resource::<Occluders>()
            .insert_resource(QteSession::new())
            .add_event::<AwarenessCrossed>()
            .add_event::<EnemySignal>()
            .add_event::<LightStimulus>()
            .add_event::<GroupCommand>()
            .add_event::<PlayerActionEvent>()
            .add_event::<QteStart>()
            .add_event::<QteOutcome>()
            .add_event::<QteComplete>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Perception,
                    SimSet::Awareness,
                    SimSet::Decision,
                    SimSet::Behavior,
                    SimSet::Navigation,
                    SimSet::Reaction,
                    SimSet::Qte,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    perception::poll_visibility.in_set(SimSet::Perception),
                    perception::update_awareness.in_set(SimSet::Awareness),
                    ai::enemy_fsm_transitions.in_set(SimSet::Decision),
                    (ai::enemy_movement_from_state, ai::lockon_update)
                        .chain()
                        .in_set(SimSet::Behavior),
                    nav::nav_agent_move.in_set(SimSet::Navigation),
                    (
                        player::toggle_player_lamp,
                        player::lamp_overlap,
                        ai::react_to_light,
                        ai::apply_group_commands,
                    )
                        .chain()
                        .in_set(SimSet::Reaction),
                    (
                        qte::qte_begin_session,
                        qte::qte_advance_pointer,
                        qte::qte_zone_overlap,
                        qte::qte_evaluate_input,
                        qte::qte_finalize,
                    )
                        .chain()
                        .in_set(SimSet::Qte),
                ),
            );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Прокрутить ровно один FixedUpdate тик
///
/// Двигаем виртуальное время руками — тест не зависит от wall clock и
/// всегда делает детерминированное число тиков.
pub fn step_fixed(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

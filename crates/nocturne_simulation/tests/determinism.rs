//! Тесты детерминизма
//!
//! Одинаковый seed и одинаковая сцена обязаны давать бит-в-бит
//! одинаковый результат: фиксированный тик + seeded RNG + ручное время.

use bevy::prelude::*;
use nocturne_simulation::{
    create_headless_app, initial_state, step_fixed, world_snapshot, Awareness, BehaviorProfile,
    ColliderVolume, EnemyConfig, EnemyState, LightReaction, LockOn, NavAgent, Observer, Occluders,
    PatrolRoute, PerceptionConfig, PerceptionState, QteSession, QteStart, Subordinates, Target,
};
use nocturne_simulation::perception::Aabb;
use nocturne_simulation::player::LampExposure;

/// Сцена: стена, патрульный, босс с lock-on, цель в конусе
fn build_scene(app: &mut App) {
    app.world_mut()
        .resource_mut::<Occluders>()
        .boxes
        .push(Aabb::new(Vec3::new(0.0, 1.5, 5.0), Vec3::new(4.0, 1.5, 0.3)));

    app.world_mut().spawn((
        Target,
        ColliderVolume::default(),
        Transform::from_xyz(0.0, 0.0, 10.0),
    ));

    let route = PatrolRoute {
        waypoints: vec![
            Vec3::new(-6.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 8.0),
        ],
    };
    let state = initial_state(Some(&route));
    let patroller = app
        .world_mut()
        .spawn((
            Observer::default(),
            PerceptionConfig::default(),
            PerceptionState::default(),
            Awareness::default(),
            state,
            BehaviorProfile {
                alerts_on_threshold: true,
                light_reaction: LightReaction::Flee,
            },
            EnemyConfig::default(),
            route,
            NavAgent::default(),
            LampExposure::default(),
            Transform::from_xyz(-6.0, 0.0, 0.0),
        ))
        .id();

    app.world_mut().spawn((
        Observer::default(),
        PerceptionConfig {
            range: 15.0,
            ..Default::default()
        },
        PerceptionState::default(),
        Awareness::default(),
        EnemyState::Idle,
        BehaviorProfile::default(),
        EnemyConfig::default(),
        LockOn::default(),
        Subordinates(vec![patroller]),
        LampExposure::default(),
        Transform::from_xyz(0.0, 0.0, 14.0).looking_to(Vec3::NEG_Z, Vec3::Y),
    ));
}

fn run_simulation(seed: u64, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    build_scene(&mut app);

    for _ in 0..tick_count {
        step_fixed(&mut app);
    }

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Transform>(world);
    snapshot.extend(world_snapshot::<EnemyState>(world));
    snapshot.extend(world_snapshot::<Awareness>(world));
    snapshot.extend(world_snapshot::<LockOn>(world));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 600;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    let snapshots: Vec<_> = (0..5).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_qte_zone_reproducible_for_same_seed() {
    let zone = |seed: u64| -> (f32, Vec<_>) {
        let mut app = create_headless_app(seed);
        app.world_mut()
            .resource_mut::<Events<QteStart>>()
            .send(QteStart {
                players: vec![0, 1],
            });
        step_fixed(&mut app);

        let start = app.world().resource::<QteSession>().zone_start_deg;
        let world = app.world_mut();
        let mut query = world.query::<&nocturne_simulation::qte::QteInstance>();
        let mut buttons: Vec<_> = query.iter(world).map(|i| (i.player, i.expected)).collect();
        buttons.sort_by_key(|(player, _)| *player);
        (start, buttons)
    };

    assert_eq!(zone(7), zone(7), "один seed — одна зона и одни кнопки");
}

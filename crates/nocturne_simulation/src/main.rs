//! Headless симуляция Nocturne
//!
//! Поднимает демо-сцену (патруль, стационарный босс, два игрока, стена)
//! и гоняет фиксированные тики без рендера

use bevy::prelude::*;

use nocturne_simulation::{
    create_headless_app, initial_state, step_fixed, Awareness, BehaviorProfile, ColliderVolume,
    EnemyConfig, EnemyState, LightReaction, LockOn, NavAgent, Observer, Occluders, PatrolRoute,
    PerceptionConfig, PerceptionState, PlayerIndex, PlayerLamp, Subordinates, Target,
};
use nocturne_simulation::perception::Aabb;
use nocturne_simulation::player::LampExposure;

fn main() {
    let seed = 42;
    println!("Starting Nocturne headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    spawn_demo_scene(app.world_mut());

    // 1000 тиков по 1/60 сек
    for tick in 0..1000 {
        step_fixed(&mut app);

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}

fn spawn_demo_scene(world: &mut World) {
    // Стена между коридором патруля и игроками
    world.resource_mut::<Occluders>().boxes.push(Aabb::new(
        Vec3::new(0.0, 1.5, 5.0),
        Vec3::new(4.0, 1.5, 0.3),
    ));

    // Два игрока с лампами
    for index in 0..2u8 {
        world.spawn((
            Target,
            ColliderVolume::default(),
            PlayerIndex(index),
            PlayerLamp::default(),
            Transform::from_xyz(-2.0 + index as f32 * 4.0, 0.0, 10.0),
        ));
    }

    // Патрульный: маршрут вокруг стены, убегает от света
    let route = PatrolRoute {
        waypoints: vec![
            Vec3::new(-6.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 8.0),
            Vec3::new(-6.0, 0.0, 8.0),
        ],
    };
    let patrol_state = initial_state(Some(&route));
    let patroller = world
        .spawn((
            Observer::default(),
            PerceptionConfig::default(),
            PerceptionState::default(),
            Awareness::default(),
            patrol_state,
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

    // Стационарный босс с lock-on и подчинённым-патрульным
    world.spawn((
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

//! QTE module — кооперативный quick-time event
//!
//! Раунд: у каждого участника стрелка крутится по кругу, нажать свою
//! кнопку надо пока стрелка в общей случайной зоне. Зона одна на раунд,
//! кнопки у участников разные (выбор без возвращения). Вся случайность
//! из DeterministicRng — раунд воспроизводим по seed.

use bevy::prelude::*;
use rand::Rng;

use crate::logger::{log, log_warning};
use crate::player::{FaceButton, PlayerAction, PlayerActionEvent};
use crate::DeterministicRng;

/// Запрос на старт QTE-раунда (от хоста)
#[derive(Event, Debug, Clone)]
pub struct QteStart {
    pub players: Vec<u8>,
}

/// Исход одного участника
#[derive(Event, Debug, Clone, Copy)]
pub struct QteOutcome {
    pub player: u8,
    pub expected: FaceButton,
    pub pressed: FaceButton,
    pub success: bool,
}

/// Раунд завершён: все участники разрешились
#[derive(Event, Debug, Clone)]
pub struct QteComplete {
    pub outcomes: Vec<QteOutcome>,
}

/// Стрелка одного участника
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct QteInstance {
    pub player: u8,
    pub expected: FaceButton,
    /// Текущий угол стрелки, градусы [0, 360)
    pub pointer_deg: f32,
    /// Градусы/с
    pub rotation_speed: f32,
    pub in_zone: bool,
    /// false после нажатия — исход зафиксирован
    pub active: bool,
}

/// Состояние текущего раунда
#[derive(Resource, Debug, Clone, Default)]
pub struct QteSession {
    pub active: bool,
    /// Начало зоны, градусы [0, 360)
    pub zone_start_deg: f32,
    pub zone_sweep_deg: f32,
    pub outcomes: Vec<QteOutcome>,
    /// Сколько исходов ждём до завершения
    pub expected: usize,
}

impl QteSession {
    pub fn new() -> Self {
        Self {
            zone_sweep_deg: 45.0,
            ..Default::default()
        }
    }
}

/// Угол внутри дуги [start, start + sweep), с учётом wrap через 360
pub fn angle_in_arc(angle_deg: f32, start_deg: f32, sweep_deg: f32) -> bool {
    let relative = (angle_deg - start_deg).rem_euclid(360.0);
    relative < sweep_deg
}

/// Система: старт раунда
///
/// Повторный QteStart при активном раунде игнорируется. Зона общая,
/// кнопки участников различны — тянем из пула без возвращения.
pub fn qte_begin_session(
    mut commands: Commands,
    mut starts: EventReader<QteStart>,
    mut session: ResMut<QteSession>,
    mut rng: ResMut<DeterministicRng>,
) {
    for start in starts.read() {
        if session.active {
            log_warning("QteStart ignored: round already active");
            continue;
        }
        if start.players.is_empty() || start.players.len() > FaceButton::ALL.len() {
            log_warning(&format!(
                "QteStart ignored: {} participants unsupported",
                start.players.len()
            ));
            continue;
        }

        session.active = true;
        session.zone_start_deg = rng.rng.gen_range(0.0..360.0);
        session.outcomes.clear();
        session.expected = start.players.len();

        let mut pool: Vec<FaceButton> = FaceButton::ALL.to_vec();
        for &player in &start.players {
            let expected = pool.swap_remove(rng.rng.gen_range(0..pool.len()));
            commands.spawn(QteInstance {
                player,
                expected,
                pointer_deg: 0.0,
                rotation_speed: 180.0,
                in_zone: false,
                active: true,
            });
        }

        log(&format!(
            "QTE round started: {} players, zone at {:.0} deg",
            session.expected, session.zone_start_deg
        ));
    }
}

/// Система: вращение стрелок
pub fn qte_advance_pointer(time: Res<Time<Fixed>>, mut instances: Query<&mut QteInstance>) {
    let delta = time.delta_secs();
    for mut instance in instances.iter_mut() {
        if !instance.active {
            continue;
        }
        instance.pointer_deg += instance.rotation_speed * delta;
        if instance.pointer_deg >= 360.0 {
            instance.pointer_deg -= 360.0;
        }
    }
}

/// Система: флаг "стрелка в зоне"
pub fn qte_zone_overlap(session: Res<QteSession>, mut instances: Query<&mut QteInstance>) {
    if !session.active {
        return;
    }
    for mut instance in instances.iter_mut() {
        instance.in_zone = angle_in_arc(
            instance.pointer_deg,
            session.zone_start_deg,
            session.zone_sweep_deg,
        );
    }
}

/// Система: нажатия участников
///
/// Исход фиксируется первым нажатием face-кнопки: правильная кнопка в
/// зоне — успех, всё остальное — провал. Повторные нажатия игнорируются.
pub fn qte_evaluate_input(
    mut actions: EventReader<PlayerActionEvent>,
    mut session: ResMut<QteSession>,
    mut outcomes: EventWriter<QteOutcome>,
    mut instances: Query<&mut QteInstance>,
) {
    if !session.active {
        return;
    }

    for action in actions.read() {
        let PlayerAction::Face(pressed) = action.action else {
            continue;
        };

        for mut instance in instances.iter_mut() {
            if instance.player != action.player || !instance.active {
                continue;
            }
            instance.active = false;

            let outcome = QteOutcome {
                player: instance.player,
                expected: instance.expected,
                pressed,
                success: pressed == instance.expected && instance.in_zone,
            };
            log(&format!(
                "QTE player {}: pressed {:?}, expected {:?}, in_zone={} -> {}",
                outcome.player,
                outcome.pressed,
                outcome.expected,
                instance.in_zone,
                if outcome.success { "success" } else { "fail" }
            ));
            session.outcomes.push(outcome);
            outcomes.write(outcome);
        }
    }
}

/// Система: завершение раунда, когда все исходы собраны
pub fn qte_finalize(
    mut commands: Commands,
    mut session: ResMut<QteSession>,
    mut completions: EventWriter<QteComplete>,
    instances: Query<Entity, With<QteInstance>>,
) {
    if !session.active || session.outcomes.len() < session.expected {
        return;
    }

    completions.write(QteComplete {
        outcomes: session.outcomes.clone(),
    });
    for entity in instances.iter() {
        commands.entity(entity).despawn();
    }
    session.active = false;
    log(&format!(
        "QTE round complete: {}/{} succeeded",
        session.outcomes.iter().filter(|o| o.success).count(),
        session.expected
    ));
}

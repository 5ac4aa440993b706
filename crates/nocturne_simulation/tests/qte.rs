//! Интеграционные тесты QTE-раунда
//!
//! Хронометраж детерминирован: стрелка 180 град/с при 60Hz = ровно 3
//! градуса за тик, зона из seeded RNG.

use bevy::prelude::*;
use nocturne_simulation::qte::{angle_in_arc, QteInstance};
use nocturne_simulation::{
    create_headless_app, step_fixed, FaceButton, PlayerAction, PlayerActionEvent, QteComplete,
    QteOutcome, QteSession, QteStart,
};

fn start_round(app: &mut App, players: Vec<u8>) {
    app.world_mut()
        .resource_mut::<Events<QteStart>>()
        .send(QteStart { players });
    step_fixed(app);
}

fn press(app: &mut App, player: u8, button: FaceButton) {
    app.world_mut()
        .resource_mut::<Events<PlayerActionEvent>>()
        .send(PlayerActionEvent {
            player,
            action: PlayerAction::Face(button),
        });
}

fn instances(app: &mut App) -> Vec<QteInstance> {
    let world = app.world_mut();
    let mut query = world.query::<&QteInstance>();
    let mut list: Vec<QteInstance> = query.iter(world).cloned().collect();
    list.sort_by_key(|i| i.player);
    list
}

fn drain_outcomes(app: &mut App) -> Vec<QteOutcome> {
    app.world_mut()
        .resource_mut::<Events<QteOutcome>>()
        .drain()
        .collect()
}

/// Крутим тики, пока стрелка игрока не окажется в начале зоны
/// (запас до края, чтобы нажатие в следующем тике осталось внутри)
fn step_until_in_zone(app: &mut App, player: u8) {
    for _ in 0..300 {
        let zone = {
            let session = app.world().resource::<QteSession>();
            (session.zone_start_deg, session.zone_sweep_deg)
        };
        let pointer = instances(app)
            .into_iter()
            .find(|i| i.player == player && i.active)
            .map(|i| i.pointer_deg);
        if let Some(pointer) = pointer {
            if angle_in_arc(pointer, zone.0, zone.1 - 15.0) {
                return;
            }
        }
        step_fixed(app);
    }
    panic!("стрелка так и не вошла в зону");
}

/// Крутим тики, пока стрелка далеко от зоны
fn step_until_out_of_zone(app: &mut App, player: u8) {
    for _ in 0..300 {
        let zone = {
            let session = app.world().resource::<QteSession>();
            session.zone_start_deg
        };
        let pointer = instances(app)
            .into_iter()
            .find(|i| i.player == player && i.active)
            .map(|i| i.pointer_deg);
        if let Some(pointer) = pointer {
            // [90, 270) градусов после начала зоны: заведомо снаружи
            let relative = (pointer - zone).rem_euclid(360.0);
            if (90.0..270.0).contains(&relative) {
                return;
            }
        }
        step_fixed(app);
    }
    panic!("стрелка так и не вышла из зоны");
}

fn other_button(button: FaceButton) -> FaceButton {
    FaceButton::ALL
        .into_iter()
        .find(|b| *b != button)
        .unwrap_or(FaceButton::North)
}

#[test]
fn test_correct_button_in_zone_succeeds() {
    let mut app = create_headless_app(7);
    start_round(&mut app, vec![0]);

    let expected = instances(&mut app)[0].expected;
    step_until_in_zone(&mut app, 0);
    press(&mut app, 0, expected);
    step_fixed(&mut app);

    let outcomes = drain_outcomes(&mut app);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success);
    assert!(!app.world().resource::<QteSession>().active, "раунд завершён");
}

#[test]
fn test_correct_button_out_of_zone_fails() {
    let mut app = create_headless_app(7);
    start_round(&mut app, vec![0]);

    let expected = instances(&mut app)[0].expected;
    step_until_out_of_zone(&mut app, 0);
    press(&mut app, 0, expected);
    step_fixed(&mut app);

    let outcomes = drain_outcomes(&mut app);
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success, "правильная кнопка вне зоны — провал");
}

#[test]
fn test_wrong_button_in_zone_fails() {
    let mut app = create_headless_app(7);
    start_round(&mut app, vec![0]);

    let expected = instances(&mut app)[0].expected;
    step_until_in_zone(&mut app, 0);
    press(&mut app, 0, other_button(expected));
    step_fixed(&mut app);

    let outcomes = drain_outcomes(&mut app);
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success, "чужая кнопка в зоне — провал");
}

#[test]
fn test_outcome_recorded_at_most_once() {
    let mut app = create_headless_app(7);
    start_round(&mut app, vec![0, 1]);

    let expected = instances(&mut app)[0].expected;
    press(&mut app, 0, expected);
    step_fixed(&mut app);
    // Повторные нажатия разрешившегося участника игнорируются
    press(&mut app, 0, expected);
    press(&mut app, 0, other_button(expected));
    step_fixed(&mut app);

    assert_eq!(drain_outcomes(&mut app).len(), 1);
    // Второй участник ещё не нажал — раунд открыт
    assert!(app.world().resource::<QteSession>().active);
}

#[test]
fn test_round_completes_when_all_resolve() {
    let mut app = create_headless_app(7);
    start_round(&mut app, vec![0, 1]);

    let current = instances(&mut app);
    press(&mut app, 0, current[0].expected);
    press(&mut app, 1, current[1].expected);
    step_fixed(&mut app);

    let completions: Vec<QteComplete> = app
        .world_mut()
        .resource_mut::<Events<QteComplete>>()
        .drain()
        .collect();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].outcomes.len(), 2);
    assert!(instances(&mut app).is_empty(), "стрелки убраны после раунда");
    assert!(!app.world().resource::<QteSession>().active);
}

#[test]
fn test_participants_get_distinct_buttons() {
    let mut app = create_headless_app(7);

    for _ in 0..50 {
        start_round(&mut app, vec![0, 1]);
        let current = instances(&mut app);
        assert_eq!(current.len(), 2);
        assert_ne!(
            current[0].expected, current[1].expected,
            "кнопки участников различны"
        );
        // Разрешаем раунд, чтобы стартовать следующий
        press(&mut app, 0, current[0].expected);
        press(&mut app, 1, current[1].expected);
        step_fixed(&mut app);
        assert!(!app.world().resource::<QteSession>().active);
    }
}

#[test]
fn test_start_during_active_round_is_ignored() {
    let mut app = create_headless_app(7);
    start_round(&mut app, vec![0]);
    assert_eq!(instances(&mut app).len(), 1);

    // Повторный старт при активном раунде не плодит стрелок
    start_round(&mut app, vec![0, 1]);
    assert_eq!(instances(&mut app).len(), 1);
}

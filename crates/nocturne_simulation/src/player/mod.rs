//! Player module — действия игроков и лампа
//!
//! Вход в симуляцию — только PlayerActionEvent: хост транслирует сырой
//! ввод (геймпад/клавиатура) в действия, ядро про устройства не знает.

use bevy::prelude::*;

use crate::ai::{LightStimulus, Subordinates};
use crate::components::Observer;
use crate::logger::log;

/// Кнопка face-группы геймпада (позиционная раскладка, без вендорских имён)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum FaceButton {
    North,
    East,
    South,
    West,
}

impl FaceButton {
    pub const ALL: [FaceButton; 4] = [
        FaceButton::North,
        FaceButton::East,
        FaceButton::South,
        FaceButton::West,
    ];
}

/// Действие игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    ToggleLamp,
    Face(FaceButton),
}

/// Событие действия игрока (вход симуляции)
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerActionEvent {
    pub player: u8,
    pub action: PlayerAction,
}

/// Индекс игрока (локальный кооп, 0-based)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PlayerIndex(pub u8);

/// Лампа игрока — источник света, на который реагируют противники
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerLamp {
    pub enabled: bool,
    pub radius: f32,
}

impl Default for PlayerLamp {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 3.0,
        }
    }
}

/// Факт нахождения наблюдателя в свете (edge-trigger для стимулов)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LampExposure {
    pub inside: bool,
}

/// Система: ToggleLamp переключает лампу соответствующего игрока
pub fn toggle_player_lamp(
    mut actions: EventReader<PlayerActionEvent>,
    mut lamps: Query<(&PlayerIndex, &mut PlayerLamp)>,
) {
    for action in actions.read() {
        if action.action != PlayerAction::ToggleLamp {
            continue;
        }
        for (index, mut lamp) in lamps.iter_mut() {
            if index.0 == action.player {
                lamp.enabled = !lamp.enabled;
                log(&format!(
                    "Player {}: lamp {}",
                    index.0,
                    if lamp.enabled { "on" } else { "off" }
                ));
            }
        }
    }
}

/// Система: пересечение света лампы с противниками
///
/// Стимул только на фронте (снаружи -> в свет): пока противник стоит в
/// луче, повторных событий нет. Лидер группы ловится как Caught, все
/// остальные как Lit.
pub fn lamp_overlap(
    mut stimuli: EventWriter<LightStimulus>,
    lamps: Query<(&Transform, &PlayerLamp)>,
    mut observers: Query<
        (Entity, &Transform, &mut LampExposure, Option<&Subordinates>),
        With<Observer>,
    >,
) {
    for (entity, transform, mut exposure, subordinates) in observers.iter_mut() {
        let mut lit_by = None;
        for (lamp_transform, lamp) in lamps.iter() {
            if !lamp.enabled {
                continue;
            }
            let sq = lamp_transform
                .translation
                .distance_squared(transform.translation);
            if sq <= lamp.radius * lamp.radius {
                lit_by = Some(lamp_transform.translation);
                break;
            }
        }

        let inside = lit_by.is_some();
        let entered = inside && !exposure.inside;
        exposure.inside = inside;

        if !entered {
            continue;
        }

        if subordinates.is_some() {
            stimuli.write(LightStimulus::Caught { leader: entity });
        } else if let Some(source) = lit_by {
            stimuli.write(LightStimulus::Lit {
                enemy: entity,
                source,
            });
        }
    }
}

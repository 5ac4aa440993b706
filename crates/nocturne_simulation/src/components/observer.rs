//! Компоненты наблюдателя: Observer, Spotlight, PerceptionConfig

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::perception::{Awareness, PerceptionState};

/// Наблюдатель — AI entity с конусом зрения
///
/// Автоматически добавляет PerceptionConfig, PerceptionState, Awareness
/// через Required Components.
///
/// `spotlight` — опциональный collaborator: entity с компонентом Spotlight,
/// чей Transform и конус используются вместо собственных. Если ссылка
/// отсутствует или entity despawned — fallback на PerceptionConfig + свой
/// Transform (логируется, не падает).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(PerceptionConfig, PerceptionState, Awareness)]
pub struct Observer {
    pub spotlight: Option<Entity>,
}

impl Observer {
    pub fn with_spotlight(spotlight: Entity) -> Self {
        Self {
            spotlight: Some(spotlight),
        }
    }
}

/// Геометрия конуса обнаружения (spotlight-like collaborator)
///
/// Позиция и forward берутся из Transform той же entity.
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Spotlight {
    /// Дальность конуса (метры)
    pub range: f32,
    /// Половина угла раскрытия (градусы)
    pub half_angle_deg: f32,
}

impl Default for Spotlight {
    fn default() -> Self {
        Self {
            range: 10.0,
            half_angle_deg: 30.0,
        }
    }
}

/// Параметры перцепции наблюдателя (fallback + тайминги проверок)
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct PerceptionConfig {
    /// Дальность обнаружения если нет Spotlight (метры)
    pub range: f32,
    /// Половина угла конуса если нет Spotlight (градусы)
    pub half_angle_deg: f32,
    /// Смещение aim point вверх от базы цели (chest height, метры)
    pub chest_offset: f32,
    /// Интервал между LOS проверками (секунды)
    pub check_interval: f32,
    /// Укороченный интервал во время Chase (меньше latency потери цели)
    pub chase_check_interval: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            range: 10.0,
            half_angle_deg: 30.0,
            chest_offset: 1.0,
            check_interval: 0.15,
            chase_check_interval: 0.05,
        }
    }
}

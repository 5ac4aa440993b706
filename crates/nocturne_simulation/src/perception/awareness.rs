//! Awareness — накопленная уверенность наблюдателя что цель рядом
//!
//! Инвариант: 0 ≤ value ≤ threshold. Растёт только при видимой цели,
//! затухает только при невидимой (rate * dt, frame-rate independent).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Компонент awareness (1:1 с Observer)
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Awareness {
    pub value: f32,
    /// Порог срабатывания (секунды видимости при rise_rate = 1)
    pub threshold: f32,
    /// Скорость набора в секунду при видимой цели
    pub rise_rate: f32,
    /// Скорость затухания в секунду без цели
    pub decay_rate: f32,
}

impl Default for Awareness {
    fn default() -> Self {
        Self {
            value: 0.0,
            threshold: 2.0,
            rise_rate: 1.0,
            decay_rate: 0.5,
        }
    }
}

impl Awareness {
    /// Интеграция одного тика; true ровно один раз при пересечении порога
    /// снизу при видимой цели. Повторный триггер — только после того как
    /// значение снова опустилось ниже порога.
    pub fn tick(&mut self, visible: bool, delta: f32) -> bool {
        let was_below = self.value < self.threshold;

        if visible {
            self.value = (self.value + self.rise_rate * delta).clamp(0.0, self.threshold);
            was_below && self.value >= self.threshold
        } else {
            self.value = (self.value - self.decay_rate * delta).max(0.0);
            false
        }
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.threshold
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Событие: awareness наблюдателя пересёк порог в этом тике
///
/// Читается FSM в том же тике (системы chained) — переход происходит
/// без задержки на кадр.
#[derive(Event, Debug, Clone, Copy)]
pub struct AwarenessCrossed {
    pub observer: Entity,
}

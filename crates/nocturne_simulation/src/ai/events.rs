//! События AI: сигналы наружу + стимулы внутрь

use bevy::prelude::*;

/// Сигнал хосту о значимом событии AI (презентация: реплики, музыка, UI)
///
/// Симуляция только пишет — на эти события внутри ядра никто не
/// подписан, поведение от них не зависит.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemySignal {
    /// Awareness пересёк порог — противник заметил цель
    Spotted {
        observer: Entity,
        /// Цель на момент обнаружения; None если sample уже протух
        target: Option<Entity>,
    },
    /// Противник попал под свет лампы
    Lit { observer: Entity },
    /// Лидер группы пойман светом
    Caught { leader: Entity },
    /// Lock-on дошёл до максимума
    LockedOn { observer: Entity, target: Entity },
}

/// Световой стимул (из player::lamp_overlap)
#[derive(Event, Debug, Clone, Copy)]
pub enum LightStimulus {
    /// Обычный противник освещён
    Lit { enemy: Entity, source: Vec3 },
    /// Освещён лидер группы — каскад команд подчинённым
    Caught { leader: Entity },
}

/// Команда от лидера подчинённому
#[derive(Event, Debug, Clone, Copy)]
pub struct GroupCommand {
    pub leader: Entity,
    pub subordinate: Entity,
    pub command: CommandKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Разбегаемся: подчинённые уходят в Flee
    Scatter,
}

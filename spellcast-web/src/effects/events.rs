//! Effect events emitted by the core for the host renderer / audio layer
//!
//! Drained once per frame by the bridge and handed to JS as JSON.

use serde::Serialize;

use crate::effects::color::Color;
use crate::gesture::{Gesture, HandSlot};
use crate::spell::{ProjectileId, ProjectileKind};

/// Why a projectile left the world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Held projectile cancelled by a gesture change or lost hand
    Cancelled,
    /// Consumed to form lightning
    Merged,
    Hit,
    /// Passed the boss without touching its bounds
    Missed,
    /// Flew past the arena
    OutOfRange,
    /// Aurora ball dropped because a hand left tracking
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboKind {
    Blink,
    Aurora,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectEvent {
    GestureChanged {
        hand: HandSlot,
        gesture: Option<Gesture>,
    },
    ProjectileSpawned {
        id: ProjectileId,
        kind: ProjectileKind,
        hand: Option<HandSlot>,
        position: [f32; 3],
    },
    ProjectileLaunched {
        id: ProjectileId,
        kind: ProjectileKind,
        velocity: [f32; 3],
    },
    ProjectileRemoved {
        id: ProjectileId,
        kind: ProjectileKind,
        reason: RemovalReason,
    },
    BossHit {
        kind: ProjectileKind,
        damage: u32,
        health: u32,
        position: [f32; 3],
    },
    /// Boss tint for the hit flash
    BossFlash {
        color: Color,
        emissive: Color,
    },
    BossFlashRestored,
    BossDefeated {
        position: [f32; 3],
    },
    /// Floating damage number
    DamageText {
        amount: u32,
        position: [f32; 3],
    },
    /// A combo's hold started
    ComboArmed {
        combo: ComboKind,
    },
    /// A combo's hold ended, either by triggering or by breaking off
    ComboReleased {
        combo: ComboKind,
    },
    BlinkTeleport {
        from: [f32; 3],
        to: [f32; 3],
    },
    /// No valid landing spot was found
    BlinkFizzled,
    AuroraBurst {
        position: [f32; 3],
    },
    AuroraBallFormed {
        id: ProjectileId,
        position: [f32; 3],
    },
    AuroraBallDropped {
        id: ProjectileId,
    },
}

/// Serialize a batch of events for the host
pub fn events_to_json(events: &[EffectEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string(events)
}

//! Effects module - colors, particles and host-facing effect events
//!
//! Re-exports only. All logic in submodules.

pub mod color;
mod damage_text;
mod events;
mod particles;

pub use damage_text::{DamageText, DamageTexts};
pub use events::{events_to_json, ComboKind, EffectEvent, RemovalReason};
pub use particles::{
    BurstStyle, Fade, Particle, ParticleOwner, ParticleSystem, AURORA_BURST, DEFEAT, EXPLOSION,
};

//! Spell module - projectile kinds, projectiles and per-hand casting
//!
//! Re-exports only. All logic in submodules.

mod hand;
mod kind;
mod projectile;

pub use hand::{CastFrame, CastPhase, CastSlot, HandSpellState};
pub use kind::{DamageRule, KindParams, ProjectileKind};
pub use projectile::{AimTarget, IdAllocator, Projectile, ProjectileId};

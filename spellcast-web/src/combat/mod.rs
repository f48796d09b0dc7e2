//! Combat module - boss target and projectile resolution
//!
//! Re-exports only. All logic in submodules.

mod boss;
mod resolver;

pub use boss::{apply_damage, Aabb, BossTarget, DamageOutcome};
pub use resolver::{integrate, resolve, CombatFrame, CombatRules};

//! Combo module - two-hand combos and the two-fist aurora ball
//!
//! Re-exports only. All logic in submodules.

mod aurora_ball;
mod detector;
mod hold;
mod teleport;

pub(crate) use aurora_ball::emission;
pub use aurora_ball::{hue_phase, scale_for_gap, AuroraBall, BallFrame};
pub use detector::{ComboDetector, ComboTrigger, HandPoints};
pub use hold::{ComboHold, Cooldown, HoldStatus};
pub use teleport::{find_landing, BlinkPose};

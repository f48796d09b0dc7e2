//! Bridge module - JS-facing API around the game world
//!
//! Re-exports only. All logic in submodules.

mod game;
mod hand_landmarks;
mod metrics;

pub use game::{
    boss_health_ratio, clear_effects, configure, debug_overlay_text, drain_events_json,
    gesture_text, set_boss_bounds, set_camera, snapshot_json, spawn_boss, tick,
};
pub use hand_landmarks::{apply_hand_landmarks, mark_hands_absent};

#[cfg(target_arch = "wasm32")]
pub(crate) use game::with_game;
#[cfg(target_arch = "wasm32")]
pub(crate) use hand_landmarks::latest_hands;

//! Spellcast Web - gesture-driven boss fight core
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The game itself (gesture classification, casting, combos, combat) lives in
//! plain modules that build and test on any target. The three.js host renders
//! the scene from the events and snapshots the bridge hands out.

pub mod combat;
pub mod combo;
pub mod config;
pub mod effects;
pub mod error;
pub mod gesture;
pub mod spell;
pub mod world;

mod bridge;
#[cfg(target_arch = "wasm32")]
mod renderer;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    apply_hand_landmarks, boss_health_ratio, clear_effects, configure, debug_overlay_text,
    drain_events_json, gesture_text, mark_hands_absent, set_boss_bounds, set_camera,
    snapshot_json, spawn_boss, tick,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console
#[wasm_bindgen]
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(log::Level::Info).is_ok() {
            log::info!("logging initialized");
        }
    }
}

/// Initialize the WebGPU debug overlay - must be called before render_frame
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn init() -> Result<(), JsValue> {
    renderer::initialize_gpu().await?;
    log::info!("WebGPU overlay initialized");
    Ok(())
}

/// Draw one debug overlay frame
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_frame() {
    renderer::render_frame();
}

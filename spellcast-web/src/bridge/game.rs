//! Game loop host: owns the world and drives it from `requestAnimationFrame`
//!
//! JS pushes landmarks whenever the tracker has them and calls `tick` once
//! per animation frame. Effects come back out as JSON (events and a full
//! snapshot) for the three.js scene to apply.

use std::cell::RefCell;
use std::time::Duration;

use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use super::hand_landmarks::{frames_received, latest_hands};
use super::metrics::{overlay_text, FrameMetrics};
use crate::config::GameConfig;
use crate::effects::events_to_json;
use crate::error::BridgeError;
use crate::gesture::HandsInput;
use crate::world::World;

/// Longest step a single tick may take (tab switches, breakpoints)
const MAX_TICK_MS: f64 = 100.0;

pub(crate) struct Game {
    world: World,
    rng: StdRng,
    last_tick_ms: Option<f64>,
    metrics: FrameMetrics,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::default(),
            rng: StdRng::seed_from_u64(seed),
            last_tick_ms: None,
            metrics: FrameMetrics::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn configure(&mut self, json: &str) -> Result<(), BridgeError> {
        let config = GameConfig::from_json(json)?;
        config.validate().map_err(BridgeError::InvalidConfig)?;
        self.world.set_config(config);
        log::info!("config applied");
        Ok(())
    }

    /// Step `dt` from the previous tick. The first tick only sets the clock base.
    pub fn tick(&mut self, now_ms: f64, hands: &HandsInput) {
        if !now_ms.is_finite() {
            log::warn!("ignoring tick with timestamp {}", now_ms);
            return;
        }
        let dt_ms = match self.last_tick_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_TICK_MS),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        self.metrics.record(dt_ms as f32);
        let dt = Duration::from_micros((dt_ms * 1000.0).round() as u64);
        self.world.update(hands, dt, &mut self.rng);
    }

    pub fn drain_events_json(&mut self) -> Result<String, BridgeError> {
        let events = self.world.drain_events();
        events_to_json(&events).map_err(|e| BridgeError::Serialization(e.to_string()))
    }

    pub fn snapshot_json(&self) -> Result<String, BridgeError> {
        self.world
            .snapshot()
            .to_json()
            .map_err(|e| BridgeError::Serialization(e.to_string()))
    }

    pub fn overlay_text(&self, tracker_frames: u64) -> String {
        overlay_text(&self.metrics, &self.world, tracker_frames)
    }
}

#[cfg(target_arch = "wasm32")]
fn host_seed() -> u64 {
    let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let low = js_sys::Date::now() as u64;
    (high << 32) ^ low
}

#[cfg(not(target_arch = "wasm32"))]
fn host_seed() -> u64 {
    0x5eed
}

// Thread-local game (WASM is single-threaded)
thread_local! {
    static GAME: RefCell<Game> = RefCell::new(Game::new(host_seed()));
}

/// Read-only access for the debug renderer
pub(crate) fn with_game<T>(f: impl FnOnce(&Game) -> T) -> T {
    GAME.with(|game| f(&game.borrow()))
}

fn with_game_mut<T>(f: impl FnOnce(&mut Game) -> T) -> T {
    GAME.with(|game| f(&mut game.borrow_mut()))
}

// ============================================================================
// WASM API
// ============================================================================

/// Replace tuning with a JSON config (missing fields keep their defaults)
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    with_game_mut(|game| game.configure(json)).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn spawn_boss(x: f32, y: f32, z: f32) {
    with_game_mut(|game| game.world.spawn_boss(Point3::new(x, y, z)));
}

/// Boss hit box corners relative to its root
#[wasm_bindgen]
pub fn set_boss_bounds(min_x: f32, min_y: f32, min_z: f32, max_x: f32, max_y: f32, max_z: f32) {
    with_game_mut(|game| {
        game.world.set_boss_bounds(
            Vector3::new(min_x, min_y, min_z),
            Vector3::new(max_x, max_y, max_z),
        )
    });
}

#[wasm_bindgen]
pub fn set_camera(eye_x: f32, eye_y: f32, eye_z: f32, target_x: f32, target_y: f32, target_z: f32, aspect: f32) {
    with_game_mut(|game| {
        game.world.set_camera(
            Point3::new(eye_x, eye_y, eye_z),
            Point3::new(target_x, target_y, target_z),
            aspect,
        )
    });
}

/// Advance one frame with the latest landmarks
#[wasm_bindgen]
pub fn tick(now_ms: f64) {
    let hands = latest_hands();
    with_game_mut(|game| game.tick(now_ms, &hands));
}

/// Effect events since the last drain, as a JSON array
#[wasm_bindgen]
pub fn drain_events_json() -> String {
    with_game_mut(|game| game.drain_events_json()).unwrap_or_else(|err| {
        log::warn!("{}", err);
        "[]".to_string()
    })
}

#[wasm_bindgen]
pub fn snapshot_json() -> String {
    with_game(|game| game.snapshot_json()).unwrap_or_else(|err| {
        log::warn!("{}", err);
        "null".to_string()
    })
}

#[wasm_bindgen]
pub fn gesture_text() -> String {
    with_game(|game| game.world().gesture_text())
}

#[wasm_bindgen]
pub fn boss_health_ratio() -> f32 {
    with_game(|game| game.world().boss_health_ratio())
}

/// Formatted overlay text (called from JS to update HTML)
#[wasm_bindgen]
pub fn debug_overlay_text() -> String {
    let tracker_frames = frames_received();
    with_game(|game| game.overlay_text(tracker_frames))
}

/// Drop every projectile and effect; boss and camera stay
#[wasm_bindgen]
pub fn clear_effects() {
    with_game_mut(|game| game.world.clear_effects());
}

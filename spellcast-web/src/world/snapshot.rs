//! Serializable per-frame view of the world for the presentation layer

use serde::Serialize;

use crate::effects::color::Color;
use crate::gesture::Gesture;
use crate::spell::{ProjectileId, ProjectileKind};

#[derive(Clone, Debug, Serialize)]
pub struct CameraView {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Screen shake displacement to add to the eye
    pub shake: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct BossView {
    pub position: [f32; 3],
    pub health: u32,
    pub max_health: u32,
    pub health_ratio: f32,
    pub flashing: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    pub position: [f32; 3],
    pub radius: f32,
    pub scale: f32,
    pub spin: f32,
    /// Still attached to a hand (charging or aurora ball)
    pub held: bool,
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParticleView {
    pub position: [f32; 3],
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct DamageTextView {
    pub amount: u32,
    pub position: [f32; 3],
    pub opacity: f32,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MarkerView {
    /// Thumb markers while a Blink hold is engaged
    pub blink: Vec<[f32; 3]>,
    /// Fingertip markers while an Aurora hold is engaged
    pub aurora: Vec<[f32; 3]>,
    /// Small per-hand glows while both fists are closed
    pub glows: Vec<[f32; 3]>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CooldownView {
    pub blink_ms: u64,
    pub aurora_ms: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub clock_ms: u64,
    pub gestures: [Option<Gesture>; 2],
    pub gesture_text: String,
    pub camera: CameraView,
    pub boss: Option<BossView>,
    pub projectiles: Vec<ProjectileView>,
    /// Stationary aurora bursts
    pub bursts: Vec<[f32; 3]>,
    pub particles: Vec<ParticleView>,
    pub damage_texts: Vec<DamageTextView>,
    pub markers: MarkerView,
    /// Blink flash strength in [0, 1]
    pub blink_flash: f32,
    pub cooldowns: CooldownView,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

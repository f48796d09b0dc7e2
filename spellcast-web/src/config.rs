//! Gameplay tuning
//!
//! Every threshold and timer read by the gesture, combo and combat systems.
//! `Default` is the shipped tuning. The host may override any subset as JSON;
//! missing fields keep their defaults.

use serde::Deserialize;
use std::time::Duration;

/// Where launched projectiles are aimed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AimMode {
    /// Straight at the boss root (camera forward when no boss is present)
    Boss,
    /// First-person variant: along the camera's view direction
    CameraForward,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gesture: GestureConfig,
    pub casting: CastingConfig,
    pub combo: ComboConfig,
    pub aurora_ball: AuroraBallConfig,
    pub combat: CombatConfig,
    pub boss: BossConfig,
    pub camera: CameraConfig,
    pub arena: ArenaConfig,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the world cannot be built from
    pub fn validate(&self) -> Result<(), String> {
        self.camera.validate()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Max gap between the arming gesture (Fist / FingerOne) and the follow-up
    pub sequence_window_ms: u64,
}

impl GestureConfig {
    pub fn sequence_window(&self) -> Duration {
        Duration::from_millis(self.sequence_window_ms)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { sequence_window_ms: 300 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CastingConfig {
    /// Scale multiplier per reference frame while a projectile is charging
    pub growth_per_frame: f32,
    /// Velocity multiplier per reference frame once launched
    pub accel_per_frame: f32,
    /// Rotation (radians per reference frame) of fully charged projectiles
    pub spin_per_frame: f32,
    pub aim: AimMode,
    /// Trail particles emitted per reference frame by each live projectile
    pub trail_particles_per_frame: u32,
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            growth_per_frame: 1.005,
            accel_per_frame: 1.015,
            spin_per_frame: 0.08,
            aim: AimMode::Boss,
            trail_particles_per_frame: 8,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Thumb-to-thumb distance arming Blink (world units)
    pub blink_threshold: f32,
    /// Thumb-to-index distance (both crossings) arming Aurora
    pub aurora_threshold: f32,
    pub hold_ms: u64,
    pub cooldown_ms: u64,
    pub blink_flash_ms: u64,
    pub teleport_attempts: u32,
    /// Teleport targets closer than this to the boss are rejected
    pub teleport_min_boss_distance: f32,
    pub burst_particles: u32,
    pub burst_lifetime_ms: u64,
}

impl ComboConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn blink_flash(&self) -> Duration {
        Duration::from_millis(self.blink_flash_ms)
    }

    pub fn burst_lifetime(&self) -> Duration {
        Duration::from_millis(self.burst_lifetime_ms)
    }
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            blink_threshold: 0.13,
            aurora_threshold: 0.13,
            hold_ms: 300,
            cooldown_ms: 5000,
            blink_flash_ms: 180,
            teleport_attempts: 20,
            teleport_min_boss_distance: 3.0,
            burst_particles: 36,
            burst_lifetime_ms: 800,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AuroraBallConfig {
    /// Thumb-to-thumb distance below which two fists hold a ball
    pub threshold: f32,
    /// Distance mapped to `min_scale`
    pub min_distance: f32,
    /// Distance mapped to `max_scale`
    pub max_distance: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub launch_speed: f32,
    pub damage: u32,
    /// Per-hand thumb-to-index distance that lights the small glow
    pub glow_threshold: f32,
    pub hue_cycles_per_second: f32,
    pub particles_per_frame: u32,
}

impl Default for AuroraBallConfig {
    fn default() -> Self {
        Self {
            threshold: 0.18,
            min_distance: 0.07,
            max_distance: 0.18,
            min_scale: 0.12,
            max_scale: 0.5,
            launch_speed: 0.19,
            damage: 30,
            glow_threshold: 0.20,
            hue_cycles_per_second: 0.25,
            particles_per_frame: 3,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub damage_min: u32,
    pub damage_max: u32,
    pub combo_bonus: u32,
    pub combo_window_ms: u64,
    pub flash_ms: u64,
    pub shake_ms: u64,
    /// Passing this close to the boss root without touching its bounds is a miss
    pub miss_distance: f32,
    /// Projectiles farther than this from the origin are dropped
    pub max_travel: f32,
    pub explosion_particles: u32,
    pub defeat_particles: u32,
    pub damage_text_ms: u64,
}

impl CombatConfig {
    pub fn combo_window(&self) -> Duration {
        Duration::from_millis(self.combo_window_ms)
    }

    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    pub fn shake(&self) -> Duration {
        Duration::from_millis(self.shake_ms)
    }

    pub fn damage_text(&self) -> Duration {
        Duration::from_millis(self.damage_text_ms)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            damage_min: 5,
            damage_max: 15,
            combo_bonus: 1,
            combo_window_ms: 300,
            flash_ms: 200,
            shake_ms: 500,
            miss_distance: 1.0,
            max_travel: 200.0,
            explosion_particles: 18,
            defeat_particles: 48,
            damage_text_ms: 1000,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub position: [f32; 3],
    pub max_health: u32,
    /// Bounding box corners relative to the boss root
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 0.0],
            max_health: 100,
            bounds_min: [-1.2, -2.0, -1.2],
            bounds_max: [1.2, 3.0, 1.2],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            eye: [0.0, 8.0, 24.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl CameraConfig {
    /// A usable perspective: finite fov in (0, 180), positive aspect and
    /// `0 < near < far`, with the eye off the target
    pub fn validate(&self) -> Result<(), String> {
        let finite = [self.fov_deg, self.near, self.far, self.aspect]
            .iter()
            .chain(self.eye.iter())
            .chain(self.target.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err("camera values must be finite".to_string());
        }
        if self.fov_deg <= 0.0 || self.fov_deg >= 180.0 {
            return Err(format!("camera.fov_deg {} outside (0, 180)", self.fov_deg));
        }
        if self.aspect <= f32::EPSILON {
            return Err(format!("camera.aspect {} must be positive", self.aspect));
        }
        if self.near <= 0.0 || self.far - self.near <= f32::EPSILON * self.far.abs().max(1.0) {
            return Err(format!(
                "camera.near {} and camera.far {} need 0 < near < far",
                self.near, self.far
            ));
        }
        if self.eye == self.target {
            return Err("camera.eye and camera.target coincide".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Playable area is [-half_extent, half_extent] on x and z
    pub half_extent: f32,
    pub eye_height: f32,
    /// Height the teleport ground probe starts from
    pub probe_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 45.0,
            eye_height: 1.6,
            probe_height: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.gesture.sequence_window(), Duration::from_millis(300));
        assert_eq!(config.combo.cooldown(), Duration::from_secs(5));
        assert_eq!(config.combat.damage_min, 5);
        assert_eq!(config.combat.damage_max, 15);
        assert_eq!(config.aurora_ball.damage, 30);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "combo": { "blink_threshold": 0.2 }, "casting": { "aim": "camera_forward" } }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert!((config.combo.blink_threshold - 0.2).abs() < 1e-6);
        assert!((config.combo.aurora_threshold - 0.13).abs() < 1e-6);
        assert_eq!(config.casting.aim, AimMode::CameraForward);
        assert_eq!(config.boss.max_health, 100);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(GameConfig::from_json("{ \"combo\": 3 }").is_err());
    }

    #[test]
    fn test_camera_validation() {
        assert!(GameConfig::default().validate().is_ok());

        let broken = [
            r#"{ "camera": { "aspect": 0 } }"#,
            r#"{ "camera": { "aspect": -1.5 } }"#,
            r#"{ "camera": { "near": 5, "far": 5 } }"#,
            r#"{ "camera": { "near": 10, "far": 1 } }"#,
            r#"{ "camera": { "near": 0 } }"#,
            r#"{ "camera": { "fov_deg": 0 } }"#,
            r#"{ "camera": { "fov_deg": 180 } }"#,
            r#"{ "camera": { "eye": [1, 2, 3], "target": [1, 2, 3] } }"#,
        ];
        for json in broken {
            let config = GameConfig::from_json(json).unwrap();
            assert!(config.validate().is_err(), "{json}");
        }

        let narrow = GameConfig::from_json(r#"{ "camera": { "fov_deg": 30, "aspect": 1 } }"#).unwrap();
        assert!(narrow.validate().is_ok());
    }
}

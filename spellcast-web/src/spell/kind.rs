//! Projectile kinds and their parameter table
//!
//! Everything that differs between fire, ice, lightning and aurora lives in
//! one `KindParams` row; the casting and combat code never branches on kind.

use serde::Serialize;

use crate::effects::color::{hex, Color};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Fire,
    Ice,
    Lightning,
    Aurora,
}

/// How a hit on the boss is scored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageRule {
    /// Uniform roll in the configured elemental range
    Rolled,
    /// Fixed amount from the aurora ball tuning
    Flat,
}

#[derive(Clone, Copy, Debug)]
pub struct KindParams {
    /// Sphere radius at scale 1
    pub radius: f32,
    /// Starting scale when spawned at a hand
    pub base_scale: f32,
    /// Charging growth stops here
    pub max_scale: f32,
    /// World units per reference frame at launch
    pub launch_speed: f32,
    pub color: Color,
    pub emissive: Color,
    pub trail_color: Color,
    /// Boss tint while the hit flash lasts (color, emissive)
    pub hit_flash: (Color, Color),
    /// Impact explosion (color, emissive)
    pub explosion: (Color, Color),
    pub damage: DamageRule,
}

const FIRE: KindParams = KindParams {
    radius: 0.12,
    base_scale: 1.0,
    max_scale: 1.5,
    launch_speed: 0.15,
    color: hex(0xff4500),
    emissive: hex(0xff6600),
    trail_color: hex(0xff5500),
    hit_flash: (hex(0xff3333), hex(0xff0000)),
    explosion: (hex(0xffee88), hex(0xffaa00)),
    damage: DamageRule::Rolled,
};

const ICE: KindParams = KindParams {
    radius: 0.12,
    base_scale: 1.0,
    max_scale: 1.5,
    launch_speed: 0.15,
    color: hex(0x66ccff),
    emissive: hex(0x66ccff),
    trail_color: hex(0x66ccff),
    hit_flash: (hex(0x99e6ff), hex(0x66ccff)),
    explosion: (hex(0xe0f7ff), hex(0x66ccff)),
    damage: DamageRule::Rolled,
};

const LIGHTNING: KindParams = KindParams {
    radius: 0.14,
    base_scale: 1.0,
    max_scale: 1.7,
    launch_speed: 0.18,
    color: hex(0x99e6ff),
    emissive: hex(0xffff66),
    trail_color: hex(0xffff66),
    hit_flash: (hex(0xffff99), hex(0x99e6ff)),
    explosion: (hex(0xffff99), hex(0x99e6ff)),
    damage: DamageRule::Rolled,
};

// Aurora scale and speed come from the aurora ball tuning
const AURORA: KindParams = KindParams {
    radius: 1.0,
    base_scale: 0.12,
    max_scale: 0.5,
    launch_speed: 0.19,
    color: hex(0x99e6ff),
    emissive: hex(0x9933ff),
    trail_color: hex(0x99e6ff),
    hit_flash: (hex(0x99e6ff), hex(0x9933ff)),
    explosion: (hex(0x99e6ff), hex(0x9933ff)),
    damage: DamageRule::Flat,
};

impl ProjectileKind {
    /// Kinds a single hand can charge
    pub const ELEMENTS: [ProjectileKind; 3] =
        [ProjectileKind::Fire, ProjectileKind::Ice, ProjectileKind::Lightning];

    pub fn params(&self) -> &'static KindParams {
        match self {
            ProjectileKind::Fire => &FIRE,
            ProjectileKind::Ice => &ICE,
            ProjectileKind::Lightning => &LIGHTNING,
            ProjectileKind::Aurora => &AURORA,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectileKind::Fire => "fire",
            ProjectileKind::Ice => "ice",
            ProjectileKind::Lightning => "lightning",
            ProjectileKind::Aurora => "aurora",
        }
    }
}

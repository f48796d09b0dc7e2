//! Cosmetic particle pool
//!
//! Every particle carries an owner. Trails and aurora-ball sparks belong to a
//! projectile and are dropped together with it; explosions and bursts are
//! free-standing and simply run out.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::effects::color::{hex, Color};
use crate::spell::ProjectileId;

/// Particles fainter than this are culled
const MIN_OPACITY: f32 = 0.05;

/// Trail opacity reaches zero after this long (40 reference frames)
const TRAIL_FADE: Duration = Duration::from_millis(667);
const TRAIL_JITTER: f32 = 0.12;
const TRAIL_SIZE: f32 = 0.02;

const AURORA_SPARK_PALETTE: [Color; 8] = [
    hex(0x99e6ff),
    hex(0x9933ff),
    hex(0x33ffcc),
    hex(0x66ff99),
    hex(0xffe066),
    hex(0xff66cc),
    hex(0x66ffd9),
    hex(0xffffff),
];

const AURORA_BURST_PALETTE: [Color; 4] =
    [hex(0x99e6ff), hex(0x9933ff), hex(0x33ffcc), hex(0x66ff99)];

const DEFEAT_PALETTE: [Color; 1] = [hex(0xffee88)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleOwner {
    /// Disposed together with the projectile (trail, aurora sparks)
    Projectile(ProjectileId),
    /// Lives out its own lifetime
    Free,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fade {
    /// Opacity = remaining life / full span
    Linear(Duration),
    /// Opacity multiplied by this factor every reference frame
    Decay(f32),
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub owner: ParticleOwner,
    pub position: Point3<f32>,
    /// World units per reference frame
    pub velocity: Vector3<f32>,
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
    life: Duration,
    fade: Fade,
}

impl Particle {
    fn alive(&self) -> bool {
        !self.life.is_zero() && self.opacity >= MIN_OPACITY
    }
}

/// Shape of an omnidirectional burst
#[derive(Clone, Copy, Debug)]
pub struct BurstStyle {
    /// Full width of the uniform velocity jitter per axis
    pub spread: f32,
    /// Constant upward velocity added to every particle
    pub lift: f32,
    pub life_min: Duration,
    pub life_max: Duration,
    pub size: f32,
    pub opacity: f32,
    pub decay: f32,
}

/// Impact sparks when a projectile hits the boss
pub const EXPLOSION: BurstStyle = BurstStyle {
    spread: 0.25,
    lift: 0.0,
    life_min: Duration::from_millis(250),
    life_max: Duration::from_millis(450),
    size: 0.025,
    opacity: 0.95,
    decay: 0.88,
};

/// Boss defeat blast
pub const DEFEAT: BurstStyle = BurstStyle {
    spread: 0.7,
    lift: 0.2,
    life_min: Duration::from_millis(700),
    life_max: Duration::from_millis(1100),
    size: 0.07,
    opacity: 0.95,
    decay: 0.88,
};

/// Stationary aurora combo burst
pub const AURORA_BURST: BurstStyle = BurstStyle {
    spread: 0.22,
    lift: 0.0,
    life_min: Duration::from_millis(500),
    life_max: Duration::from_millis(800),
    size: 0.035,
    opacity: 0.85,
    decay: 0.92,
};

fn random_life(rng: &mut impl Rng, min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

fn jitter(rng: &mut impl Rng, spread: f32) -> Vector3<f32> {
    let half = spread * 0.5;
    Vector3::new(
        rng.gen_range(-half..=half),
        rng.gen_range(-half..=half),
        rng.gen_range(-half..=half),
    )
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn count_owned(&self, owner: ParticleOwner) -> usize {
        self.particles.iter().filter(|p| p.owner == owner).count()
    }

    /// Short-lived sparks streaming off a projectile
    pub fn spawn_trail(
        &mut self,
        owner: ParticleOwner,
        at: Point3<f32>,
        color: Color,
        count: u32,
        rng: &mut impl Rng,
    ) {
        for _ in 0..count {
            let life = random_life(rng, TRAIL_FADE / 2, TRAIL_FADE);
            let opacity = life.as_secs_f32() / TRAIL_FADE.as_secs_f32();
            self.particles.push(Particle {
                owner,
                position: at,
                velocity: jitter(rng, TRAIL_JITTER),
                color,
                size: TRAIL_SIZE,
                opacity,
                life,
                fade: Fade::Linear(TRAIL_FADE),
            });
        }
    }

    pub fn spawn_burst(
        &mut self,
        at: Point3<f32>,
        style: &BurstStyle,
        palette: &[Color],
        count: u32,
        rng: &mut impl Rng,
    ) {
        if palette.is_empty() {
            return;
        }
        for _ in 0..count {
            let mut velocity = jitter(rng, style.spread);
            velocity.y += style.lift;
            self.particles.push(Particle {
                owner: ParticleOwner::Free,
                position: at,
                velocity,
                color: palette[rng.gen_range(0..palette.len())],
                size: style.size,
                opacity: style.opacity,
                life: random_life(rng, style.life_min, style.life_max),
                fade: Fade::Decay(style.decay),
            });
        }
    }

    pub fn spawn_explosion(&mut self, at: Point3<f32>, color: Color, count: u32, rng: &mut impl Rng) {
        self.spawn_burst(at, &EXPLOSION, &[color], count, rng);
    }

    pub fn spawn_defeat(&mut self, at: Point3<f32>, count: u32, rng: &mut impl Rng) {
        self.spawn_burst(at, &DEFEAT, &DEFEAT_PALETTE, count, rng);
    }

    pub fn spawn_aurora_burst(&mut self, at: Point3<f32>, count: u32, rng: &mut impl Rng) {
        self.spawn_burst(at, &AURORA_BURST, &AURORA_BURST_PALETTE, count, rng);
    }

    /// Sparks thrown outward from an aurora ball; faster and larger for
    /// bigger balls
    pub fn spawn_radial(
        &mut self,
        owner: ParticleOwner,
        center: Point3<f32>,
        scale: f32,
        count: u32,
        rng: &mut impl Rng,
    ) {
        for _ in 0..count {
            let theta = rng.gen_range(0.0..TAU);
            let phi = rng.gen_range(0.0..PI);
            let direction = Vector3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            let r = 0.18 + rng.gen_range(0.0..0.25) * scale;
            self.particles.push(Particle {
                owner,
                position: center,
                velocity: direction * (r * 0.13 + 0.03),
                color: AURORA_SPARK_PALETTE[rng.gen_range(0..AURORA_SPARK_PALETTE.len())],
                size: 0.03 + rng.gen_range(0.0..0.04) * scale,
                opacity: rng.gen_range(0.8..1.0),
                life: random_life(rng, Duration::from_millis(700), Duration::from_millis(1100)),
                fade: Fade::Decay(0.96),
            });
        }
    }

    /// Drop every particle belonging to `owner`
    pub fn dispose_owner(&mut self, owner: ParticleOwner) {
        self.particles.retain(|p| p.owner != owner);
    }

    /// Advance by `dt`; `frames` is `dt` in reference frames
    pub fn update(&mut self, dt: Duration, frames: f32) {
        for p in &mut self.particles {
            p.position += p.velocity * frames;
            p.life = p.life.saturating_sub(dt);
            p.opacity = match p.fade {
                Fade::Linear(span) => {
                    (p.life.as_secs_f32() / span.as_secs_f32().max(f32::EPSILON)).min(1.0)
                }
                Fade::Decay(factor) => p.opacity * factor.powf(frames),
            };
        }
        self.particles.retain(Particle::alive);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

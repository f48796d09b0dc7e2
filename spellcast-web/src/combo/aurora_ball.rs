//! Two-fist aurora ball: charge between the thumbs, throw with open palms
//!
//! Both fists with thumbs close together form the ball at the thumbs'
//! midpoint; its size follows the thumb gap. Once formed it stays until both
//! palms open (thrown) or a hand leaves tracking (dropped on the spot).

use std::time::Duration;

use nalgebra::{center, distance, Point3};
use rand::Rng;

use super::detector::HandPoints;
use crate::config::AuroraBallConfig;
use crate::effects::{EffectEvent, ParticleOwner, ParticleSystem, RemovalReason};
use crate::gesture::Gesture;
use crate::spell::{AimTarget, IdAllocator, Projectile, ProjectileKind};

/// World state the ball reads and writes during its update
pub struct BallFrame<'a> {
    /// `dt` in reference frames
    pub frames: f32,
    pub aim: AimTarget,
    pub ids: &'a mut IdAllocator,
    pub events: &'a mut Vec<EffectEvent>,
    pub particles: &'a mut ParticleSystem,
    pub launched: &'a mut Vec<Projectile>,
    pub retired: &'a mut Vec<(Projectile, RemovalReason)>,
}

#[derive(Debug, Default)]
pub struct AuroraBall {
    held: Option<Projectile>,
    /// Per-hand thumb glow while both fists are closed
    glows: [Option<Point3<f32>>; 2],
}

/// Ball scale for a thumb gap, linear between the configured extremes
pub fn scale_for_gap(gap: f32, config: &AuroraBallConfig) -> f32 {
    let span = (config.max_distance - config.min_distance).max(f32::EPSILON);
    let t = (gap - config.min_distance) / span;
    let scale = config.min_scale + (config.max_scale - config.min_scale) * t;
    scale.clamp(config.min_scale, config.max_scale)
}

/// Particle count for `frames` reference frames, at least one
pub(crate) fn emission(per_frame: u32, frames: f32) -> u32 {
    if per_frame == 0 {
        return 0;
    }
    ((per_frame as f32 * frames).round() as u32).max(1)
}

impl AuroraBall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<&Projectile> {
        self.held.as_ref()
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn glows(&self) -> &[Option<Point3<f32>>; 2] {
        &self.glows
    }

    pub fn update<R: Rng>(
        &mut self,
        hands: &[Option<HandPoints>; 2],
        gestures: &[Option<Gesture>; 2],
        config: &AuroraBallConfig,
        frame: &mut BallFrame,
        rng: &mut R,
    ) {
        let [Some(first), Some(second)] = hands else {
            self.glows = [None, None];
            self.abandon(frame);
            return;
        };

        let both = |g: Gesture| gestures.iter().all(|&x| x == Some(g));
        let both_fists = both(Gesture::Fist);
        let both_open = both(Gesture::OpenPalm);

        for (glow, points) in self.glows.iter_mut().zip([first, second]) {
            let pinched = distance(&points.thumb, &points.index) < config.glow_threshold;
            *glow = (both_fists && pinched).then_some(points.thumb);
        }

        let gap = distance(&first.thumb, &second.thumb);
        if both_fists && gap < config.threshold {
            let midpoint = center(&first.thumb, &second.thumb);
            let scale = scale_for_gap(gap, config);
            let ball = self.held.get_or_insert_with(|| {
                let ball = Projectile::new(frame.ids.next_id(), ProjectileKind::Aurora, midpoint);
                log::info!("aurora ball formed ({:?})", ball.id);
                frame.events.push(EffectEvent::AuroraBallFormed {
                    id: ball.id,
                    position: ball.position_array(),
                });
                ball
            });
            ball.position = midpoint;
            ball.scale = scale;
        }

        let Some(ball) = self.held.as_ref() else {
            return;
        };
        frame.particles.spawn_radial(
            ParticleOwner::Projectile(ball.id),
            ball.position,
            ball.scale,
            emission(config.particles_per_frame, frame.frames),
            rng,
        );

        if both_open {
            if let Some(mut ball) = self.held.take() {
                ball.launch_at(&frame.aim, config.launch_speed);
                log::info!("aurora ball thrown ({:?})", ball.id);
                frame.events.push(EffectEvent::ProjectileLaunched {
                    id: ball.id,
                    kind: ball.kind,
                    velocity: [ball.velocity.x, ball.velocity.y, ball.velocity.z],
                });
                frame.launched.push(ball);
            }
        }
    }

    /// Drop a held ball immediately
    pub fn abandon(&mut self, frame: &mut BallFrame) {
        if let Some(ball) = self.held.take() {
            log::debug!("aurora ball dropped ({:?})", ball.id);
            frame.events.push(EffectEvent::AuroraBallDropped { id: ball.id });
            frame.retired.push((ball, RemovalReason::Abandoned));
        }
    }
}

/// Hue phase of an aurora ball at `clock`; each ball is offset by its id
pub fn hue_phase(clock: Duration, id: u64, config: &AuroraBallConfig) -> f32 {
    clock.as_secs_f32() * config.hue_cycles_per_second + (id % 8) as f32 * 0.125
}

//! In-flight projectile integration and boss hit resolution
//!
//! The resolver is the only place launched projectiles are destroyed. Each
//! one ends exactly once: it hits the boss, passes close to the boss root
//! without touching it, or leaves the arena.

use std::time::Duration;

use nalgebra::{distance, Point3};
use rand::Rng;

use super::boss::{Aabb, BossTarget};
use crate::config::{CastingConfig, CombatConfig};
use crate::effects::{DamageTexts, EffectEvent, ParticleSystem, RemovalReason};
use crate::spell::{DamageRule, Projectile};

/// World state touched while resolving combat
pub struct CombatFrame<'a> {
    pub now: Duration,
    /// `dt` in reference frames
    pub frames: f32,
    pub events: &'a mut Vec<EffectEvent>,
    pub particles: &'a mut ParticleSystem,
    pub damage_texts: &'a mut DamageTexts,
    pub retired: &'a mut Vec<(Projectile, RemovalReason)>,
    /// Set when the boss goes down
    pub shake_until: &'a mut Option<Duration>,
}

/// Tuning the resolver reads
pub struct CombatRules<'a> {
    pub combat: &'a CombatConfig,
    pub casting: &'a CastingConfig,
    /// Flat damage of aurora projectiles
    pub flat_damage: u32,
}

/// Move one projectile forward by `frames` reference frames
pub fn integrate(projectile: &mut Projectile, casting: &CastingConfig, frames: f32) {
    projectile.velocity *= casting.accel_per_frame.powf(frames);
    projectile.position += projectile.velocity * frames;
    if projectile.fully_charged {
        projectile.spin += casting.spin_per_frame * frames;
    }
}

fn roll_damage(projectile: &Projectile, rules: &CombatRules, rng: &mut impl Rng) -> u32 {
    match projectile.params().damage {
        DamageRule::Rolled => {
            let (lo, hi) = (rules.combat.damage_min, rules.combat.damage_max);
            rng.gen_range(lo.min(hi)..=hi.max(lo))
        }
        DamageRule::Flat => rules.flat_damage,
    }
}

/// Advance every in-flight projectile and settle hits. Clears `boss` on
/// defeat.
pub fn resolve<R: Rng>(
    in_flight: &mut Vec<Projectile>,
    boss: &mut Option<BossTarget>,
    rules: &CombatRules,
    frame: &mut CombatFrame,
    rng: &mut R,
) {
    for mut projectile in std::mem::take(in_flight) {
        integrate(&mut projectile, rules.casting, frame.frames);

        let hit_box = Aabb::around(projectile.position, projectile.half_extent());
        if let Some(target) = boss.as_mut().filter(|b| b.bounds().intersects(&hit_box)) {
            let roll = roll_damage(&projectile, rules, rng);
            if let Some(outcome) = target.take_hit(roll, frame.now, rules.combat) {
                let at = projectile.position;
                let params = projectile.params();
                log::debug!(
                    "{} hit for {} ({} hp left)",
                    projectile.kind.name(),
                    outcome.dealt,
                    outcome.health
                );
                frame.events.push(EffectEvent::BossHit {
                    kind: projectile.kind,
                    damage: outcome.dealt,
                    health: outcome.health,
                    position: [at.x, at.y, at.z],
                });
                frame.particles.spawn_explosion(at, params.explosion.0, rules.combat.explosion_particles, rng);
                frame.damage_texts.spawn(outcome.dealt, at, rules.combat.damage_text());
                frame.events.push(EffectEvent::DamageText {
                    amount: outcome.dealt,
                    position: [at.x, at.y, at.z],
                });

                if outcome.defeated {
                    let root = target.position;
                    log::info!("boss defeated");
                    *boss = None;
                    frame.particles.spawn_defeat(root, rules.combat.defeat_particles, rng);
                    *frame.shake_until = Some(frame.now + rules.combat.shake());
                    frame.events.push(EffectEvent::BossDefeated {
                        position: [root.x, root.y, root.z],
                    });
                } else {
                    target.start_flash(frame.now + rules.combat.flash());
                    let (color, emissive) = params.hit_flash;
                    frame.events.push(EffectEvent::BossFlash { color, emissive });
                }
            }
            frame.retired.push((projectile, RemovalReason::Hit));
            continue;
        }

        let anchor = boss.as_ref().map_or_else(Point3::origin, |b| b.position);
        if distance(&projectile.position, &anchor) < rules.combat.miss_distance {
            frame.retired.push((projectile, RemovalReason::Missed));
        } else if projectile.position.coords.norm() > rules.combat.max_travel {
            frame.retired.push((projectile, RemovalReason::OutOfRange));
        } else {
            in_flight.push(projectile);
        }
    }
}

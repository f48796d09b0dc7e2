//! The world: every piece of mutable game state and the per-frame update
//!
//! Frame order:
//! 1. advance the clock
//! 2. move in-flight projectiles and resolve boss hits
//! 3. classify both hands
//! 4. per-hand casting (paused while a combo hold or aurora ball is active)
//! 5. two-hand combos
//! 6. two-fist aurora ball
//! 7. finalize removals, emit trails, run down timers

use std::time::Duration;

use nalgebra::{Point3, Vector3};
use rand::Rng;

use super::camera::Camera;
use super::snapshot::{
    BossView, CameraView, CooldownView, DamageTextView, MarkerView, ParticleView, ProjectileView,
    WorldSnapshot,
};
use super::terrain::Terrain;
use crate::combat::{resolve, BossTarget, CombatFrame, CombatRules};
use crate::combo::{
    emission, find_landing, hue_phase, AuroraBall, BallFrame, ComboDetector, ComboTrigger,
    HandPoints,
};
use crate::config::{AimMode, GameConfig};
use crate::effects::color::aurora_cycle;
use crate::effects::{DamageTexts, EffectEvent, ParticleOwner, ParticleSystem, RemovalReason};
use crate::gesture::{
    classify_opt, readout, Gesture, HandLandmarks, HandSlot, HandsInput, INDEX_TIP, PALM,
    THUMB_TIP,
};
use crate::spell::{
    AimTarget, CastFrame, HandSpellState, IdAllocator, Projectile, ProjectileKind,
};

/// One rendered frame at the reference rate
pub const REFERENCE_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Peak eye displacement while the screen shakes
const SHAKE_AMPLITUDE: f32 = 0.15;

fn to_array(p: &Point3<f32>) -> [f32; 3] {
    [p.x, p.y, p.z]
}

/// `dt` expressed in reference frames
pub fn reference_frames(dt: Duration) -> f32 {
    dt.as_secs_f32() / REFERENCE_FRAME.as_secs_f32()
}

/// Stationary ball left by the Aurora combo
#[derive(Clone, Debug)]
struct AuroraBurst {
    position: Point3<f32>,
    until: Duration,
}

pub struct World {
    config: GameConfig,
    clock: Duration,
    camera: Camera,
    terrain: Terrain,
    gestures: [Option<Gesture>; 2],
    hands: [HandSpellState; 2],
    combos: ComboDetector,
    aurora_ball: AuroraBall,
    bursts: Vec<AuroraBurst>,
    in_flight: Vec<Projectile>,
    boss: Option<BossTarget>,
    particles: ParticleSystem,
    damage_texts: DamageTexts,
    ids: IdAllocator,
    events: Vec<EffectEvent>,
    shake_until: Option<Duration>,
    blink_flash_until: Option<Duration>,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        Self {
            camera: Camera::from_config(&config.camera),
            terrain: Terrain::new(config.arena.half_extent),
            boss: Some(BossTarget::from_config(&config.boss)),
            config,
            clock: Duration::ZERO,
            gestures: [None, None],
            hands: Default::default(),
            combos: ComboDetector::new(),
            aurora_ball: AuroraBall::new(),
            bursts: Vec::new(),
            in_flight: Vec::new(),
            particles: ParticleSystem::new(),
            damage_texts: DamageTexts::default(),
            ids: IdAllocator::default(),
            events: Vec::new(),
            shake_until: None,
            blink_flash_until: None,
        }
    }

    // ========================================================================
    // HOST CONTROLS
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Swap tuning. Camera pose and boss state are kept.
    pub fn set_config(&mut self, config: GameConfig) {
        let (eye, target) = (self.camera.eye, self.camera.target);
        self.camera = Camera::from_config(&config.camera);
        self.camera.set_pose(eye, target);
        self.terrain = Terrain::new(config.arena.half_extent);
        self.config = config;
    }

    /// Place a fresh boss at `position` (replaces any current one)
    pub fn spawn_boss(&mut self, position: Point3<f32>) {
        log::info!("boss spawned at {:?}", to_array(&position));
        self.boss = Some(BossTarget::new(position, &self.config.boss));
    }

    pub fn set_boss_bounds(&mut self, min: Vector3<f32>, max: Vector3<f32>) {
        if let Some(boss) = self.boss.as_mut() {
            boss.set_local_bounds(min, max);
        }
    }

    pub fn set_camera(&mut self, eye: Point3<f32>, target: Point3<f32>, aspect: f32) {
        self.camera.set_pose(eye, target);
        self.camera.set_aspect(aspect);
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn boss(&self) -> Option<&BossTarget> {
        self.boss.as_ref()
    }

    pub fn gestures(&self) -> &[Option<Gesture>; 2] {
        &self.gestures
    }

    pub fn hand(&self, slot: HandSlot) -> &HandSpellState {
        &self.hands[slot.index()]
    }

    pub fn combos(&self) -> &ComboDetector {
        &self.combos
    }

    pub fn aurora_ball(&self) -> &AuroraBall {
        &self.aurora_ball
    }

    pub fn in_flight(&self) -> &[Projectile] {
        &self.in_flight
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn damage_texts(&self) -> &DamageTexts {
        &self.damage_texts
    }

    pub fn pending_events(&self) -> &[EffectEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EffectEvent> {
        std::mem::take(&mut self.events)
    }

    /// Readout text for both hands
    pub fn gesture_text(&self) -> String {
        readout(&self.gestures)
    }

    pub fn boss_health_ratio(&self) -> f32 {
        self.boss.as_ref().map_or(0.0, BossTarget::health_ratio)
    }

    /// Per-hand casting is paused
    pub fn casting_suppressed(&self) -> bool {
        self.combos.is_holding()
            || self.aurora_ball.is_held()
            || self.in_flight.iter().any(|p| p.kind == ProjectileKind::Aurora)
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_until.is_some()
    }

    pub fn is_blink_flashing(&self) -> bool {
        self.blink_flash_until.is_some()
    }

    fn aim_target(&self) -> AimTarget {
        match (self.config.casting.aim, self.boss.as_ref()) {
            (AimMode::Boss, Some(boss)) => AimTarget::Point(boss.position),
            _ => AimTarget::Direction(self.camera.forward()),
        }
    }

    fn hand_points(&self, hand: &HandLandmarks) -> HandPoints {
        HandPoints {
            thumb: self.camera.landmark_to_world(&hand[THUMB_TIP]),
            index: self.camera.landmark_to_world(&hand[INDEX_TIP]),
        }
    }

    // ========================================================================
    // FRAME UPDATE
    // ========================================================================

    pub fn update<R: Rng>(&mut self, input: &HandsInput, dt: Duration, rng: &mut R) {
        self.clock += dt;
        let now = self.clock;
        let frames = reference_frames(dt);
        let mut retired: Vec<(Projectile, RemovalReason)> = Vec::new();

        // Combat
        {
            let rules = CombatRules {
                combat: &self.config.combat,
                casting: &self.config.casting,
                flat_damage: self.config.aurora_ball.damage,
            };
            let mut frame = CombatFrame {
                now,
                frames,
                events: &mut self.events,
                particles: &mut self.particles,
                damage_texts: &mut self.damage_texts,
                retired: &mut retired,
                shake_until: &mut self.shake_until,
            };
            resolve(&mut self.in_flight, &mut self.boss, &rules, &mut frame, rng);
        }

        // Classification
        let gestures = [0, 1].map(|i| classify_opt(input[i].as_ref()));
        for slot in HandSlot::BOTH {
            let gesture = gestures[slot.index()];
            if gesture != self.gestures[slot.index()] {
                self.events.push(EffectEvent::GestureChanged { hand: slot, gesture });
            }
        }
        self.gestures = gestures;
        let points = [0, 1].map(|i| input[i].as_ref().map(|hand| self.hand_points(hand)));

        // Per-hand casting
        if !self.casting_suppressed() {
            let aim = self.aim_target();
            for slot in HandSlot::BOTH {
                let i = slot.index();
                let Some(hand) = input[i].as_ref() else {
                    continue;
                };
                let mut frame = CastFrame {
                    hand: slot,
                    now,
                    frames,
                    palm: self.camera.landmark_to_world(&hand[PALM]),
                    aim,
                    window: self.config.gesture.sequence_window(),
                    growth: self.config.casting.growth_per_frame,
                    ids: &mut self.ids,
                    events: &mut self.events,
                    launched: &mut self.in_flight,
                    retired: &mut retired,
                };
                self.hands[i].step(gestures[i], &mut frame);
            }
        }

        // Two-hand combos
        let trigger = self.combos.update(
            &points,
            self.aurora_ball.is_held(),
            now,
            &self.config.combo,
            &mut self.events,
        );
        match trigger {
            Some(ComboTrigger::Blink) => self.blink(rng),
            Some(ComboTrigger::AuroraBurst { at }) => self.aurora_burst(at, rng),
            None => {}
        }

        // Two-fist aurora ball
        {
            let mut frame = BallFrame {
                frames,
                aim: self.aim_target(),
                ids: &mut self.ids,
                events: &mut self.events,
                particles: &mut self.particles,
                launched: &mut self.in_flight,
                retired: &mut retired,
            };
            self.aurora_ball
                .update(&points, &gestures, &self.config.aurora_ball, &mut frame, rng);
        }

        for (projectile, reason) in retired {
            self.retire(projectile, reason);
        }
        self.emit_trails(frames, rng);
        self.run_timers(dt, frames);
    }

    /// Final step of every projectile's life
    fn retire(&mut self, projectile: Projectile, reason: RemovalReason) {
        self.particles
            .dispose_owner(ParticleOwner::Projectile(projectile.id));
        self.events.push(EffectEvent::ProjectileRemoved {
            id: projectile.id,
            kind: projectile.kind,
            reason,
        });
    }

    fn emit_trails<R: Rng>(&mut self, frames: f32, rng: &mut R) {
        let trail_count = emission(self.config.casting.trail_particles_per_frame, frames);
        let spark_count = emission(self.config.aurora_ball.particles_per_frame, frames);
        let held = self.hands.iter().flat_map(HandSpellState::projectiles);
        for projectile in held.chain(self.in_flight.iter()) {
            let owner = ParticleOwner::Projectile(projectile.id);
            if projectile.kind == ProjectileKind::Aurora {
                self.particles
                    .spawn_radial(owner, projectile.position, projectile.scale, spark_count, rng);
            } else {
                let color = projectile.params().trail_color;
                self.particles
                    .spawn_trail(owner, projectile.position, color, trail_count, rng);
            }
        }
    }

    fn run_timers(&mut self, dt: Duration, frames: f32) {
        let now = self.clock;
        self.particles.update(dt, frames);
        self.damage_texts.update(dt, frames);

        if let Some(boss) = self.boss.as_mut() {
            if boss.tick_flash(now) {
                self.events.push(EffectEvent::BossFlashRestored);
            }
        }
        if self.shake_until.map_or(false, |until| now >= until) {
            self.shake_until = None;
        }
        if self.blink_flash_until.map_or(false, |until| now >= until) {
            self.blink_flash_until = None;
        }
        self.bursts.retain(|burst| now < burst.until);
    }

    fn blink<R: Rng>(&mut self, rng: &mut R) {
        let boss = self.boss.as_ref().map(|b| b.position);
        let landing = find_landing(
            &self.terrain,
            boss,
            &self.config.combo,
            &self.config.arena,
            rng,
        );
        let Some(pose) = landing else {
            log::warn!("blink found no landing spot");
            self.events.push(EffectEvent::BlinkFizzled);
            return;
        };
        let from = self.camera.eye;
        self.camera.set_pose(pose.eye, pose.target);
        self.blink_flash_until = Some(self.clock + self.config.combo.blink_flash());
        log::info!("blink to {:?}", to_array(&pose.eye));
        self.events.push(EffectEvent::BlinkTeleport {
            from: to_array(&from),
            to: to_array(&pose.eye),
        });
    }

    fn aurora_burst<R: Rng>(&mut self, at: Point3<f32>, rng: &mut R) {
        log::info!("aurora burst at {:?}", to_array(&at));
        self.bursts.push(AuroraBurst {
            position: at,
            until: self.clock + self.config.combo.burst_lifetime(),
        });
        self.particles
            .spawn_aurora_burst(at, self.config.combo.burst_particles, rng);
        self.events.push(EffectEvent::AuroraBurst { position: to_array(&at) });
    }

    /// Drop every projectile and effect; the boss and camera stay
    pub fn clear_effects(&mut self) {
        let mut retired = Vec::new();
        for hand in &mut self.hands {
            hand.clear(&mut retired);
        }
        retired.extend(
            self.in_flight
                .drain(..)
                .map(|p| (p, RemovalReason::Cancelled)),
        );
        {
            let mut frame = BallFrame {
                frames: 0.0,
                aim: AimTarget::Direction(self.camera.forward()),
                ids: &mut self.ids,
                events: &mut self.events,
                particles: &mut self.particles,
                launched: &mut self.in_flight,
                retired: &mut retired,
            };
            self.aurora_ball.abandon(&mut frame);
        }
        self.combos.disarm(&mut self.events);
        for (projectile, reason) in retired {
            self.retire(projectile, reason);
        }
        self.bursts.clear();
        self.particles.clear();
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    fn shake_offset(&self) -> [f32; 3] {
        let Some(until) = self.shake_until else {
            return [0.0; 3];
        };
        let total = self.config.combat.shake().as_secs_f32().max(f32::EPSILON);
        let left = until.saturating_sub(self.clock).as_secs_f32() / total;
        let t = self.clock.as_secs_f32();
        let amplitude = SHAKE_AMPLITUDE * left.clamp(0.0, 1.0);
        [(t * 61.0).sin() * amplitude, (t * 47.0).cos() * amplitude, 0.0]
    }

    fn projectile_view(&self, projectile: &Projectile, held: bool) -> ProjectileView {
        let params = projectile.params();
        let (color, emissive, emissive_intensity) = if projectile.kind == ProjectileKind::Aurora {
            let phase = hue_phase(self.clock, projectile.id.0, &self.config.aurora_ball);
            let (color, intensity) = aurora_cycle(phase);
            (color, color, intensity)
        } else {
            (params.color, params.emissive, 1.5)
        };
        ProjectileView {
            id: projectile.id,
            kind: projectile.kind,
            position: to_array(&projectile.position),
            radius: params.radius,
            scale: projectile.scale,
            spin: projectile.spin,
            held,
            color,
            emissive,
            emissive_intensity,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let now = self.clock;
        let held = self
            .hands
            .iter()
            .flat_map(HandSpellState::projectiles)
            .chain(self.aurora_ball.held())
            .map(|p| self.projectile_view(p, true));
        let flying = self.in_flight.iter().map(|p| self.projectile_view(p, false));

        let blink_flash = self.blink_flash_until.map_or(0.0, |until| {
            let left = until.saturating_sub(now).as_secs_f32();
            (left * 3.0).min(1.0)
        });

        WorldSnapshot {
            clock_ms: now.as_millis() as u64,
            gestures: self.gestures,
            gesture_text: self.gesture_text(),
            camera: CameraView {
                eye: to_array(&self.camera.eye),
                target: to_array(&self.camera.target),
                shake: self.shake_offset(),
            },
            boss: self.boss.as_ref().map(|boss| BossView {
                position: to_array(&boss.position),
                health: boss.health(),
                max_health: boss.max_health(),
                health_ratio: boss.health_ratio(),
                flashing: boss.is_flashing(),
            }),
            projectiles: held.chain(flying).collect(),
            bursts: self.bursts.iter().map(|b| to_array(&b.position)).collect(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    position: to_array(&p.position),
                    color: p.color,
                    size: p.size,
                    opacity: p.opacity,
                })
                .collect(),
            damage_texts: self
                .damage_texts
                .iter()
                .map(|t| DamageTextView {
                    amount: t.amount,
                    position: to_array(&t.position),
                    opacity: t.opacity(),
                })
                .collect(),
            markers: MarkerView {
                blink: self.combos.blink().markers().iter().map(to_array).collect(),
                aurora: self.combos.aurora().markers().iter().map(to_array).collect(),
                glows: self.aurora_ball.glows().iter().flatten().map(to_array).collect(),
            },
            blink_flash,
            cooldowns: CooldownView {
                blink_ms: self.combos.blink_cooldown(now).as_millis() as u64,
                aurora_ms: self.combos.aurora_cooldown(now).as_millis() as u64,
            },
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

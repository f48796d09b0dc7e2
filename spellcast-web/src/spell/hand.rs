//! Per-hand casting state machine
//!
//! Each tracked hand owns one `HandSpellState` with a cast slot per element.
//! Spells are armed by a Fist (or FingerOne for the merge) and must be
//! followed by the next gesture inside the sequence window.
//!
//! Transitions per frame, first match wins:
//! 1. Fist: cancel fire and ice, re-arm both slots
//! 2. Victory after Fist: start charging fire (blocked while lightning is held)
//! 3. OpenPalm: launch charging fire
//! 4. FingerOne after Fist: start charging ice (blocked while lightning is held)
//! 5. Victory after FingerOne with ice charging: merge fire + ice into
//!    lightning, or restart as fire when only ice is held
//!
//! Then, independently: held projectiles follow and grow, OpenPalm launches
//! ice and lightning, and an unrecognized pose cancels everything held.

use std::time::Duration;

use nalgebra::Point3;

use super::kind::ProjectileKind;
use super::projectile::{AimTarget, IdAllocator, Projectile};
use crate::effects::{EffectEvent, RemovalReason};
use crate::gesture::{Gesture, HandSlot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastPhase {
    Idle,
    Charging,
    /// Launched; needs a Fist to re-arm
    Fired,
}

#[derive(Debug)]
pub struct CastSlot {
    phase: CastPhase,
    projectile: Option<Projectile>,
}

impl Default for CastSlot {
    fn default() -> Self {
        Self {
            phase: CastPhase::Idle,
            projectile: None,
        }
    }
}

impl CastSlot {
    pub fn phase(&self) -> CastPhase {
        self.phase
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    fn is_idle(&self) -> bool {
        self.phase == CastPhase::Idle
    }

    fn is_charging(&self) -> bool {
        self.phase == CastPhase::Charging && self.projectile.is_some()
    }

    fn holds(&self) -> bool {
        self.projectile.is_some()
    }

    fn start(&mut self, projectile: Projectile) -> Option<Projectile> {
        self.phase = CastPhase::Charging;
        self.projectile.replace(projectile)
    }

    /// Drop back to Idle, handing out whatever was held
    fn reset(&mut self) -> Option<Projectile> {
        self.phase = CastPhase::Idle;
        self.projectile.take()
    }

    /// Reset only when something is held; a spent slot stays Fired
    fn take_held(&mut self) -> Option<Projectile> {
        if self.holds() {
            self.reset()
        } else {
            None
        }
    }

    fn fire(&mut self) -> Option<Projectile> {
        let projectile = self.projectile.take()?;
        self.phase = CastPhase::Fired;
        Some(projectile)
    }
}

/// Everything one hand's step reads from and writes to the world
pub struct CastFrame<'a> {
    pub hand: HandSlot,
    pub now: Duration,
    /// `dt` in reference frames
    pub frames: f32,
    /// Unprojected palm anchor
    pub palm: Point3<f32>,
    pub aim: AimTarget,
    pub window: Duration,
    /// Scale multiplier per reference frame
    pub growth: f32,
    pub ids: &'a mut IdAllocator,
    pub events: &'a mut Vec<EffectEvent>,
    /// Projectiles that left the hand this frame
    pub launched: &'a mut Vec<Projectile>,
    /// Projectiles destroyed this frame, to be finalized by the world
    pub retired: &'a mut Vec<(Projectile, RemovalReason)>,
}

impl CastFrame<'_> {
    fn within_window(&self, since: Option<Duration>) -> bool {
        since.map_or(false, |t| self.now.saturating_sub(t) < self.window)
    }

    fn spawn(&mut self, kind: ProjectileKind, at: Point3<f32>) -> Projectile {
        let projectile = Projectile::new(self.ids.next_id(), kind, at);
        log::debug!("{:?} hand: charging {} ({:?})", self.hand, kind.name(), projectile.id);
        self.events.push(EffectEvent::ProjectileSpawned {
            id: projectile.id,
            kind,
            hand: Some(self.hand),
            position: projectile.position_array(),
        });
        projectile
    }

    fn retire(&mut self, projectile: Option<Projectile>, reason: RemovalReason) {
        if let Some(projectile) = projectile {
            self.retired.push((projectile, reason));
        }
    }

    fn launch(&mut self, projectile: Option<Projectile>) {
        let Some(mut projectile) = projectile else {
            return;
        };
        projectile.launch_at(&self.aim, projectile.params().launch_speed);
        log::debug!("{:?} hand: launched {} ({:?})", self.hand, projectile.kind.name(), projectile.id);
        self.events.push(EffectEvent::ProjectileLaunched {
            id: projectile.id,
            kind: projectile.kind,
            velocity: [projectile.velocity.x, projectile.velocity.y, projectile.velocity.z],
        });
        self.launched.push(projectile);
    }
}

#[derive(Debug, Default)]
pub struct HandSpellState {
    fire: CastSlot,
    ice: CastSlot,
    lightning: CastSlot,
    last_fist: Option<Duration>,
    last_victory: Option<Duration>,
    last_finger_one: Option<Duration>,
}

impl HandSpellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: ProjectileKind) -> Option<&CastSlot> {
        match kind {
            ProjectileKind::Fire => Some(&self.fire),
            ProjectileKind::Ice => Some(&self.ice),
            ProjectileKind::Lightning => Some(&self.lightning),
            ProjectileKind::Aurora => None,
        }
    }

    /// Held (charging) projectiles
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        [&self.fire, &self.ice, &self.lightning]
            .into_iter()
            .filter_map(CastSlot::projectile)
    }

    pub fn last_victory(&self) -> Option<Duration> {
        self.last_victory
    }

    /// Lightning never shares a hand with fire or ice, and a slot only
    /// charges while it holds a projectile
    pub fn is_consistent(&self) -> bool {
        let slots_ok = [&self.fire, &self.ice, &self.lightning]
            .iter()
            .all(|slot| (slot.phase == CastPhase::Charging) == slot.holds());
        let exclusive = !(self.lightning.holds() && (self.fire.holds() || self.ice.holds()));
        slots_ok && exclusive
    }

    /// Advance one frame for a hand that has landmarks
    pub fn step(&mut self, gesture: Option<Gesture>, frame: &mut CastFrame) {
        self.transition(gesture, frame);
        self.follow_and_release(gesture, frame);
    }

    fn transition(&mut self, gesture: Option<Gesture>, frame: &mut CastFrame) {
        let now = frame.now;
        let palm = frame.palm;
        match gesture {
            Some(Gesture::Fist) => {
                self.last_fist = Some(now);
                frame.retire(self.fire.reset(), RemovalReason::Cancelled);
                frame.retire(self.ice.reset(), RemovalReason::Cancelled);
            }
            Some(Gesture::Victory)
                if self.fire.is_idle()
                    && frame.within_window(self.last_fist)
                    && !self.lightning.holds() =>
            {
                let fire = frame.spawn(ProjectileKind::Fire, palm);
                frame.retire(self.fire.start(fire), RemovalReason::Cancelled);
                self.last_victory = Some(now);
            }
            Some(Gesture::OpenPalm) if self.fire.is_charging() => {
                frame.launch(self.fire.fire());
            }
            Some(Gesture::FingerOne)
                if self.ice.is_idle()
                    && frame.within_window(self.last_fist)
                    && !self.lightning.holds() =>
            {
                let ice = frame.spawn(ProjectileKind::Ice, palm);
                frame.retire(self.ice.start(ice), RemovalReason::Cancelled);
                self.last_finger_one = Some(now);
            }
            Some(Gesture::Victory)
                if self.ice.is_charging() && frame.within_window(self.last_finger_one) =>
            {
                self.merge(frame);
            }
            _ => {}
        }
    }

    fn merge(&mut self, frame: &mut CastFrame) {
        let Some(ice) = self.ice.reset() else {
            return;
        };
        if let Some(fire) = self.fire.take_held() {
            let midpoint = nalgebra::center(&ice.position, &fire.position);
            log::info!("{:?} hand: fire and ice merged into lightning", frame.hand);
            frame.retire(Some(ice), RemovalReason::Merged);
            frame.retire(Some(fire), RemovalReason::Merged);
            let lightning = frame.spawn(ProjectileKind::Lightning, midpoint);
            frame.retire(self.lightning.start(lightning), RemovalReason::Cancelled);
            return;
        }

        // Ice alone: drop it, and start fire only from an idle slot
        frame.retire(Some(ice), RemovalReason::Cancelled);
        if self.fire.is_idle() {
            let palm = frame.palm;
            let fire = frame.spawn(ProjectileKind::Fire, palm);
            frame.retire(self.fire.start(fire), RemovalReason::Cancelled);
            self.last_victory = Some(frame.now);
        }
    }

    fn follow_and_release(&mut self, gesture: Option<Gesture>, frame: &mut CastFrame) {
        let growth = frame.growth.powf(frame.frames);
        let palm = frame.palm;
        let follow = |slot: &mut CastSlot| {
            if let Some(projectile) = slot.projectile.as_mut() {
                projectile.position = palm;
                projectile.grow(growth);
            }
        };

        match gesture {
            Some(Gesture::Victory) => {
                follow(&mut self.fire);
                follow(&mut self.lightning);
            }
            Some(Gesture::FingerOne) => follow(&mut self.ice),
            Some(Gesture::OpenPalm) => {
                if self.ice.is_charging() {
                    frame.launch(self.ice.fire());
                }
                if self.lightning.is_charging() {
                    frame.launch(self.lightning.fire());
                }
            }
            Some(Gesture::Fist) => {}
            None => self.cancel_all(frame),
        }
    }

    fn cancel_all(&mut self, frame: &mut CastFrame) {
        for slot in [&mut self.fire, &mut self.ice, &mut self.lightning] {
            if slot.holds() {
                frame.retire(slot.reset(), RemovalReason::Cancelled);
            }
        }
    }

    /// Drop every held projectile (world reset)
    pub fn clear(&mut self, retired: &mut Vec<(Projectile, RemovalReason)>) {
        for slot in [&mut self.fire, &mut self.ice, &mut self.lightning] {
            if let Some(projectile) = slot.reset() {
                retired.push((projectile, RemovalReason::Cancelled));
            }
        }
        self.last_fist = None;
        self.last_victory = None;
        self.last_finger_one = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const FRAME: Duration = Duration::from_nanos(16_666_667);

    struct Harness {
        state: HandSpellState,
        ids: IdAllocator,
        events: Vec<EffectEvent>,
        launched: Vec<Projectile>,
        retired: Vec<(Projectile, RemovalReason)>,
        palm: Point3<f32>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: HandSpellState::new(),
                ids: IdAllocator::default(),
                events: Vec::new(),
                launched: Vec::new(),
                retired: Vec::new(),
                palm: Point3::new(0.0, 7.5, 23.5),
            }
        }

        fn step(&mut self, gesture: Option<Gesture>, now_ms: u64) {
            let mut frame = CastFrame {
                hand: HandSlot::First,
                now: Duration::from_millis(now_ms),
                frames: 1.0,
                palm: self.palm,
                aim: AimTarget::Point(Point3::new(0.0, 2.0, 0.0)),
                window: Duration::from_millis(300),
                growth: 1.005,
                ids: &mut self.ids,
                events: &mut self.events,
                launched: &mut self.launched,
                retired: &mut self.retired,
            };
            self.state.step(gesture, &mut frame);
        }

        fn phase(&self, kind: ProjectileKind) -> CastPhase {
            self.state.slot(kind).map(CastSlot::phase).unwrap_or(CastPhase::Idle)
        }

        fn holds(&self, kind: ProjectileKind) -> bool {
            self.state.slot(kind).map_or(false, CastSlot::holds)
        }
    }

    #[test]
    fn test_fire_starts_inside_window() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 1000);
        h.step(Some(Gesture::Victory), 1299);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Charging);
        assert!(h.holds(ProjectileKind::Fire));
    }

    #[test]
    fn test_fire_rejected_after_window() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 1000);
        h.step(Some(Gesture::Victory), 1301);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Idle);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_window_is_strict() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 1000);
        h.step(Some(Gesture::Victory), 1300);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Idle);
    }

    #[test]
    fn test_victory_without_fist_does_nothing() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Victory), 0);
        h.step(Some(Gesture::Victory), 100);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Idle);
    }

    #[test]
    fn test_open_palm_launches_toward_aim() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::Victory), 100);
        h.step(Some(Gesture::Victory), 117);
        h.step(Some(Gesture::OpenPalm), 133);

        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Fired);
        assert_eq!(h.launched.len(), 1);
        let fire = &h.launched[0];
        assert!((fire.velocity.norm() - 0.15).abs() < 1e-5);
        let to_boss: Vector3<f32> = (Point3::new(0.0, 2.0, 0.0) - fire.position).normalize();
        assert!(fire.velocity.normalize().dot(&to_boss) > 0.999);
    }

    #[test]
    fn test_fired_slot_needs_fist_to_rearm() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::Victory), 100);
        h.step(Some(Gesture::OpenPalm), 200);
        h.step(Some(Gesture::Victory), 250);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Fired);

        h.step(Some(Gesture::Fist), 1000);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Idle);
        h.step(Some(Gesture::Victory), 1100);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Charging);
    }

    #[test]
    fn test_held_projectile_follows_and_grows() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::Victory), 100);
        h.palm = Point3::new(1.0, 7.0, 23.0);
        for i in 0..10 {
            h.step(Some(Gesture::Victory), 117 + i * 17);
        }
        let fire = h.state.slot(ProjectileKind::Fire).and_then(CastSlot::projectile).unwrap();
        assert_eq!(fire.position, h.palm);
        assert!(fire.scale > 1.05 && fire.scale < 1.06);
    }

    #[test]
    fn test_merge_spawns_one_lightning_at_midpoint() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.palm = Point3::new(-1.0, 7.0, 23.0);
        h.step(Some(Gesture::FingerOne), 50);
        h.palm = Point3::new(1.0, 8.0, 23.0);
        h.step(Some(Gesture::Victory), 100);
        assert!(h.holds(ProjectileKind::Fire) && h.holds(ProjectileKind::Ice));

        h.palm = Point3::new(5.0, 5.0, 5.0);
        h.step(Some(Gesture::Victory), 117);

        assert!(!h.holds(ProjectileKind::Fire));
        assert!(!h.holds(ProjectileKind::Ice));
        let merged: Vec<_> = h
            .retired
            .iter()
            .filter(|(_, reason)| *reason == RemovalReason::Merged)
            .map(|(p, _)| p.kind)
            .collect();
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&ProjectileKind::Fire) && merged.contains(&ProjectileKind::Ice));

        let spawned_lightning: Vec<_> = h
            .events
            .iter()
            .filter_map(|e| match e {
                EffectEvent::ProjectileSpawned { kind: ProjectileKind::Lightning, position, .. } => {
                    Some(*position)
                }
                _ => None,
            })
            .collect();
        assert_eq!(spawned_lightning, vec![[0.0, 7.5, 23.0]]);
        assert_eq!(h.phase(ProjectileKind::Lightning), CastPhase::Charging);
    }

    #[test]
    fn test_ice_alone_falls_back_to_fire() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::FingerOne), 100);
        // Fist window closed, FingerOne window still open
        h.step(Some(Gesture::Victory), 350);

        assert!(!h.holds(ProjectileKind::Ice));
        assert!(h.holds(ProjectileKind::Fire));
        assert!(!h.holds(ProjectileKind::Lightning));
        assert_eq!(h.state.last_victory(), Some(Duration::from_millis(350)));
    }

    #[test]
    fn test_ice_alone_leaves_spent_fire() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::Victory), 50);
        h.step(Some(Gesture::OpenPalm), 100);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Fired);
        h.step(Some(Gesture::FingerOne), 150);
        h.step(Some(Gesture::Victory), 200);

        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Fired);
        assert!(!h.holds(ProjectileKind::Fire));
        assert!(!h.holds(ProjectileKind::Ice));
        assert!(!h.holds(ProjectileKind::Lightning));
        assert_eq!(h.launched.len(), 1);
        let fires = h
            .events
            .iter()
            .filter(|e| matches!(e, EffectEvent::ProjectileSpawned { kind: ProjectileKind::Fire, .. }))
            .count();
        assert_eq!(fires, 1);
        assert_eq!(h.retired.len(), 1);
        assert_eq!(h.retired[0].0.kind, ProjectileKind::Ice);
        assert_eq!(h.retired[0].1, RemovalReason::Cancelled);
        assert_eq!(h.state.last_victory(), Some(Duration::from_millis(50)));
        assert!(h.state.is_consistent());
    }

    #[test]
    fn test_fist_keeps_lightning() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::FingerOne), 50);
        h.step(Some(Gesture::Victory), 100);
        h.step(Some(Gesture::Victory), 117);
        assert!(h.holds(ProjectileKind::Lightning));

        h.step(Some(Gesture::Fist), 200);
        assert!(h.holds(ProjectileKind::Lightning));

        // Lightning blocks new fire and ice
        h.step(Some(Gesture::Victory), 250);
        assert!(!h.holds(ProjectileKind::Fire));
        h.step(Some(Gesture::Fist), 300);
        h.step(Some(Gesture::FingerOne), 350);
        assert!(!h.holds(ProjectileKind::Ice));
    }

    #[test]
    fn test_lightning_launches_faster() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::FingerOne), 50);
        h.step(Some(Gesture::Victory), 100);
        h.step(Some(Gesture::Victory), 117);
        h.step(Some(Gesture::OpenPalm), 133);

        assert_eq!(h.launched.len(), 1);
        assert_eq!(h.launched[0].kind, ProjectileKind::Lightning);
        assert!((h.launched[0].velocity.norm() - 0.18).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_pose_cancels_everything() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::FingerOne), 50);
        h.step(Some(Gesture::Victory), 100);
        h.step(None, 117);

        assert_eq!(h.state.projectiles().count(), 0);
        assert_eq!(h.phase(ProjectileKind::Fire), CastPhase::Idle);
        assert_eq!(h.phase(ProjectileKind::Ice), CastPhase::Idle);
        assert!(h.retired.iter().all(|(_, r)| *r == RemovalReason::Cancelled));
        assert_eq!(h.retired.len(), 2);
    }

    #[test]
    fn test_slot_invariant_over_random_sequences() {
        let gestures = [
            None,
            Some(Gesture::OpenPalm),
            Some(Gesture::Victory),
            Some(Gesture::FingerOne),
            Some(Gesture::Fist),
        ];
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut h = Harness::new();
            let mut now = 0u64;
            for _ in 0..120 {
                now += rng.gen_range(5..200);
                let gesture = gestures[rng.gen_range(0..gestures.len())];
                h.step(gesture, now);
                assert!(h.state.is_consistent());
                assert!(h.state.projectiles().count() <= 2);
            }
            // Every id is destroyed or launched at most once
            let mut seen: Vec<_> = h
                .retired
                .iter()
                .map(|(p, _)| p.id)
                .chain(h.launched.iter().map(|p| p.id))
                .collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), total);
        }
    }

    #[test]
    fn test_growth_scales_with_frame_length() {
        let mut h = Harness::new();
        h.step(Some(Gesture::Fist), 0);
        h.step(Some(Gesture::Victory), 100);
        let before = h.state.slot(ProjectileKind::Fire).and_then(CastSlot::projectile).unwrap().scale;

        let mut frame = CastFrame {
            hand: HandSlot::First,
            now: Duration::from_millis(100) + FRAME * 2,
            frames: 2.0,
            palm: h.palm,
            aim: AimTarget::Direction(-Vector3::z()),
            window: Duration::from_millis(300),
            growth: 1.005,
            ids: &mut h.ids,
            events: &mut h.events,
            launched: &mut h.launched,
            retired: &mut h.retired,
        };
        h.state.step(Some(Gesture::Victory), &mut frame);
        let after = h.state.slot(ProjectileKind::Fire).and_then(CastSlot::projectile).unwrap().scale;
        assert!((after / before - 1.005f32.powi(2)).abs() < 1e-5);
    }
}

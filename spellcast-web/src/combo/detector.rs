//! Two-hand combo detection (Blink, Aurora burst)
//!
//! Both combos watch fingertip distances in world space and fire after the
//! pose is held. Blink is evaluated first and the two holds exclude each
//! other: an engaged Aurora hold blocks Blink from arming, and an engaged
//! Blink hold blocks Aurora.

use std::time::Duration;

use nalgebra::{distance, Point3};

use super::hold::{ComboHold, Cooldown, HoldStatus};
use crate::config::ComboConfig;
use crate::effects::{ComboKind, EffectEvent};

/// World-space fingertips of one tracked hand
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPoints {
    pub thumb: Point3<f32>,
    pub index: Point3<f32>,
}

/// A combo that completed this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComboTrigger {
    Blink,
    AuroraBurst { at: Point3<f32> },
}

#[derive(Debug, Default)]
pub struct ComboDetector {
    blink: ComboHold,
    aurora: ComboHold,
    blink_cooldown: Cooldown,
    aurora_cooldown: Cooldown,
}

fn note(status: HoldStatus, combo: ComboKind, events: &mut Vec<EffectEvent>) {
    match status {
        HoldStatus::Armed => events.push(EffectEvent::ComboArmed { combo }),
        HoldStatus::Released => events.push(EffectEvent::ComboReleased { combo }),
        _ => {}
    }
}

impl ComboDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Either hold engaged; per-hand casting pauses meanwhile
    pub fn is_holding(&self) -> bool {
        self.blink.is_active() || self.aurora.is_active()
    }

    pub fn blink(&self) -> &ComboHold {
        &self.blink
    }

    pub fn aurora(&self) -> &ComboHold {
        &self.aurora
    }

    pub fn blink_cooldown(&self, now: Duration) -> Duration {
        self.blink_cooldown.remaining(now)
    }

    pub fn aurora_cooldown(&self, now: Duration) -> Duration {
        self.aurora_cooldown.remaining(now)
    }

    /// Let go of both holds
    pub fn disarm(&mut self, events: &mut Vec<EffectEvent>) {
        note(self.blink.release(), ComboKind::Blink, events);
        note(self.aurora.release(), ComboKind::Aurora, events);
    }

    /// Evaluate both combos for one frame. `ball_present` disarms everything
    /// while a two-fist aurora ball exists.
    pub fn update(
        &mut self,
        hands: &[Option<HandPoints>; 2],
        ball_present: bool,
        now: Duration,
        config: &ComboConfig,
        events: &mut Vec<EffectEvent>,
    ) -> Option<ComboTrigger> {
        if ball_present {
            self.disarm(events);
            return None;
        }
        let pair = match hands {
            [Some(a), Some(b)] => Some((*a, *b)),
            _ => None,
        };

        // A blink that fires this frame ends the frame's combo checks
        if let Some(trigger) = self.update_blink(pair, now, config, events) {
            return Some(trigger);
        }
        self.update_aurora(pair, now, config, events)
    }

    fn update_blink(
        &mut self,
        pair: Option<(HandPoints, HandPoints)>,
        now: Duration,
        config: &ComboConfig,
        events: &mut Vec<EffectEvent>,
    ) -> Option<ComboTrigger> {
        let close = pair.filter(|(a, b)| distance(&a.thumb, &b.thumb) < config.blink_threshold);
        let Some((a, b)) = close.filter(|_| self.blink_cooldown.is_ready(now)) else {
            note(self.blink.release(), ComboKind::Blink, events);
            return None;
        };
        if self.aurora.is_active() {
            note(self.blink.release(), ComboKind::Blink, events);
            return None;
        }

        let status = self.blink.engage(now, config.hold(), &[a.thumb, b.thumb]);
        note(status, ComboKind::Blink, events);
        if status != HoldStatus::Triggered {
            return None;
        }
        // The hold ends with the teleport
        note(self.blink.release(), ComboKind::Blink, events);
        self.blink_cooldown.start(now, config.cooldown());
        Some(ComboTrigger::Blink)
    }

    fn update_aurora(
        &mut self,
        pair: Option<(HandPoints, HandPoints)>,
        now: Duration,
        config: &ComboConfig,
        events: &mut Vec<EffectEvent>,
    ) -> Option<ComboTrigger> {
        if !self.aurora_cooldown.is_ready(now) {
            note(self.aurora.release(), ComboKind::Aurora, events);
            return None;
        }
        if self.blink.is_active() {
            return None;
        }
        let crossed = pair.filter(|(a, b)| {
            distance(&a.thumb, &b.index) < config.aurora_threshold
                && distance(&a.index, &b.thumb) < config.aurora_threshold
        });
        let Some((a, b)) = crossed else {
            note(self.aurora.release(), ComboKind::Aurora, events);
            return None;
        };

        let points = [a.thumb, b.index, a.index, b.thumb];
        let status = self.aurora.engage(now, config.hold(), &points);
        note(status, ComboKind::Aurora, events);
        if status != HoldStatus::Triggered {
            return None;
        }
        self.aurora_cooldown.start(now, config.cooldown());
        let sum = points.iter().fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        Some(ComboTrigger::AuroraBurst {
            at: Point3::from(sum / 4.0),
        })
    }
}

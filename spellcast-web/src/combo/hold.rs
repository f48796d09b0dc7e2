//! Sustained-pose hold timer and cooldown

use std::time::Duration;

use nalgebra::Point3;

/// What a hold did this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldStatus {
    /// Not engaged
    Idle,
    /// Engaged this frame
    Armed,
    /// Still engaged, trigger pending or already spent
    Holding,
    /// Held long enough; fires once per hold
    Triggered,
    /// Was engaged, now let go
    Released,
}

#[derive(Clone, Debug, Default)]
pub struct ComboHold {
    started_at: Option<Duration>,
    triggered: bool,
    /// Tracked points shown while the hold is engaged
    markers: Vec<Point3<f32>>,
}

impl ComboHold {
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn markers(&self) -> &[Point3<f32>] {
        &self.markers
    }

    /// Keep the hold engaged at `now`; triggers once `hold` has elapsed
    pub fn engage(&mut self, now: Duration, hold: Duration, markers: &[Point3<f32>]) -> HoldStatus {
        self.markers.clear();
        self.markers.extend_from_slice(markers);

        let Some(started) = self.started_at else {
            self.started_at = Some(now);
            self.triggered = false;
            return HoldStatus::Armed;
        };

        if !self.triggered && now.saturating_sub(started) >= hold {
            self.triggered = true;
            return HoldStatus::Triggered;
        }
        HoldStatus::Holding
    }

    pub fn release(&mut self) -> HoldStatus {
        self.markers.clear();
        self.triggered = false;
        if self.started_at.take().is_some() {
            HoldStatus::Released
        } else {
            HoldStatus::Idle
        }
    }
}

/// Absolute-time cooldown; ready again once the clock passes `ready_at`
#[derive(Clone, Copy, Debug, Default)]
pub struct Cooldown {
    ready_at: Option<Duration>,
}

impl Cooldown {
    pub fn start(&mut self, now: Duration, length: Duration) {
        self.ready_at = Some(now + length);
    }

    pub fn is_ready(&self, now: Duration) -> bool {
        self.ready_at.map_or(true, |at| now >= at)
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.ready_at.map_or(Duration::ZERO, |at| at.saturating_sub(now))
    }
}

//! Frame timing and the debug overlay text

use std::time::Duration;

use crate::world::World;

/// Smoothed frame timing
#[derive(Default)]
pub(crate) struct FrameMetrics {
    fps: f32,
    frame_time_ms: f32,
}

impl FrameMetrics {
    /// Feed one frame time. Tab-backgrounded or first frames are ignored.
    pub fn record(&mut self, frame_time_ms: f32) {
        if !(1.0..=200.0).contains(&frame_time_ms) {
            return;
        }
        // Exponential moving average for smooth display
        self.fps = self.fps * 0.9 + (1000.0 / frame_time_ms) * 0.1;
        self.frame_time_ms = self.frame_time_ms * 0.9 + frame_time_ms * 0.1;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

fn cooldown_label(left: Duration) -> String {
    if left.is_zero() {
        "ready".to_string()
    } else {
        format!("{:.1}s", left.as_secs_f32())
    }
}

/// Multi-line text for the HTML debug overlay
pub(crate) fn overlay_text(metrics: &FrameMetrics, world: &World, tracker_frames: u64) -> String {
    let now = world.clock();
    let gestures = world.gesture_text();
    let boss = match world.boss() {
        Some(boss) => format!("{}/{}", boss.health(), boss.max_health()),
        None => "defeated".to_string(),
    };
    format!(
        "FPS: {:.0} | Frame: {:.1}ms\n\
         Tracker frames: {}\n\
         Hands: {}\n\
         Boss: {}\n\
         Blink: {} | Aurora: {}\n\
         Flying: {} | Particles: {}",
        metrics.fps,
        metrics.frame_time_ms,
        tracker_frames,
        if gestures.is_empty() { "-" } else { gestures.as_str() },
        boss,
        cooldown_label(world.combos().blink_cooldown(now)),
        cooldown_label(world.combos().aurora_cooldown(now)),
        world.in_flight().len(),
        world.particles().len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_outlier_frames() {
        let mut metrics = FrameMetrics::default();
        metrics.record(500.0);
        metrics.record(0.2);
        assert_eq!(metrics.fps(), 0.0);

        metrics.record(16.0);
        assert!((metrics.fps() - 6.25).abs() < 1e-3);
    }

    #[test]
    fn test_overlay_for_fresh_world() {
        let world = World::default();
        let text = overlay_text(&FrameMetrics::default(), &world, 0);
        assert!(text.contains("Hands: -"));
        assert!(text.contains("Boss: 100/100"));
        assert!(text.contains("Blink: ready | Aurora: ready"));
    }
}

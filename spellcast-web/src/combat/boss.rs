//! Boss target: health, hit bookkeeping and bounding box

use std::time::Duration;

use nalgebra::{Point3, Vector3};

use crate::config::{BossConfig, CombatConfig};

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn around(center: Point3<f32>, half_extent: f32) -> Self {
        let half = Vector3::repeat(half_extent);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Touching faces count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }
}

/// Result of one scored hit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage actually applied, bonus included
    pub dealt: u32,
    pub health: u32,
    /// Health reached zero with this hit
    pub defeated: bool,
}

/// Score a hit: `roll` plus `bonus` when the previous hit landed inside
/// `window`, clamped at zero health
pub fn apply_damage(
    health: u32,
    roll: u32,
    last_hit: Option<Duration>,
    now: Duration,
    window: Duration,
    bonus: u32,
) -> DamageOutcome {
    let chained = last_hit.map_or(false, |t| now.saturating_sub(t) < window);
    let dealt = if chained { roll + bonus } else { roll };
    let remaining = health.saturating_sub(dealt);
    DamageOutcome {
        dealt,
        health: remaining,
        defeated: health > 0 && remaining == 0,
    }
}

#[derive(Clone, Debug)]
pub struct BossTarget {
    pub position: Point3<f32>,
    health: u32,
    max_health: u32,
    last_hit: Option<Duration>,
    /// Box corners relative to `position`
    local_min: Vector3<f32>,
    local_max: Vector3<f32>,
    flash_until: Option<Duration>,
}

impl BossTarget {
    pub fn new(position: Point3<f32>, config: &BossConfig) -> Self {
        Self {
            position,
            health: config.max_health,
            max_health: config.max_health,
            last_hit: None,
            local_min: Vector3::from(config.bounds_min),
            local_max: Vector3::from(config.bounds_max),
            flash_until: None,
        }
    }

    pub fn from_config(config: &BossConfig) -> Self {
        Self::new(Point3::from(config.position), config)
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Remaining health in [0, 1] for the HP bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn set_local_bounds(&mut self, min: Vector3<f32>, max: Vector3<f32>) {
        self.local_min = min.inf(&max);
        self.local_max = min.sup(&max);
    }

    /// World-space bounds at the current position
    pub fn bounds(&self) -> Aabb {
        Aabb {
            min: self.position + self.local_min,
            max: self.position + self.local_max,
        }
    }

    /// Apply one hit. `None` once the boss is already down.
    pub fn take_hit(&mut self, roll: u32, now: Duration, config: &CombatConfig) -> Option<DamageOutcome> {
        if self.is_defeated() {
            return None;
        }
        let outcome = apply_damage(
            self.health,
            roll,
            self.last_hit,
            now,
            config.combo_window(),
            config.combo_bonus,
        );
        self.last_hit = Some(now);
        self.health = outcome.health;
        Some(outcome)
    }

    pub fn start_flash(&mut self, until: Duration) {
        self.flash_until = Some(until);
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some()
    }

    /// Ends an expired flash; true on the frame it ends
    pub fn tick_flash(&mut self, now: Duration) -> bool {
        match self.flash_until {
            Some(until) if now >= until => {
                self.flash_until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_overkill_clamps_and_defeats_once() {
        let config = CombatConfig::default();
        let mut boss = BossTarget::from_config(&BossConfig {
            max_health: 10,
            ..BossConfig::default()
        });

        let outcome = boss.take_hit(12, ms(1000), &config).unwrap();
        assert_eq!(outcome.health, 0);
        assert!(outcome.defeated);
        assert_eq!(boss.health(), 0);

        assert_eq!(boss.take_hit(12, ms(1100), &config), None);
        assert_eq!(boss.health(), 0);
    }

    #[test]
    fn test_quick_follow_up_gets_bonus() {
        let window = ms(300);
        let first = apply_damage(100, 7, None, ms(1000), window, 1);
        assert_eq!(first.dealt, 7);
        let chained = apply_damage(first.health, 7, Some(ms(1000)), ms(1299), window, 1);
        assert_eq!(chained.dealt, 8);
        let late = apply_damage(first.health, 7, Some(ms(1000)), ms(1300), window, 1);
        assert_eq!(late.dealt, 7);
    }

    #[test]
    fn test_bounds_follow_position() {
        let mut boss = BossTarget::from_config(&BossConfig::default());
        boss.position = Point3::new(10.0, 0.0, 0.0);
        let bounds = boss.bounds();
        assert!((bounds.min - Point3::new(8.8, -2.0, -1.2)).norm() < 1e-5);
        assert!(bounds.intersects(&Aabb::around(Point3::new(11.3, 2.9, 0.0), 0.12)));
        assert!(!bounds.intersects(&Aabb::around(Point3::new(12.0, 0.0, 0.0), 0.12)));
    }

    #[test]
    fn test_flash_expires() {
        let mut boss = BossTarget::from_config(&BossConfig::default());
        boss.start_flash(ms(200));
        assert!(!boss.tick_flash(ms(199)));
        assert!(boss.tick_flash(ms(200)));
        assert!(!boss.is_flashing());
        assert!(!boss.tick_flash(ms(300)));
    }
}

//! Arena ground heightfield and downward ray casts
//!
//! Mirrors the rolling ground the host renders (low-frequency sine/cosine
//! swell). The per-vertex noise the host adds is below the eye height margin
//! and is not modelled.

use nalgebra::Point3;

const SWELL_AMPLITUDE: f32 = 1.2;
const SWELL_FREQ_X: f32 = 0.15;
const SWELL_FREQ_Z: f32 = 0.18;

/// Ray march step before bisection
const MARCH_STEP: f32 = 0.5;
const BISECT_ITERATIONS: u32 = 12;

#[derive(Clone, Debug)]
pub struct Terrain {
    half_extent: f32,
}

impl Terrain {
    pub fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x.abs() <= self.half_extent && z.abs() <= self.half_extent
    }

    /// Ground height, `None` outside the playable area
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        if !self.contains(x, z) {
            return None;
        }
        Some((x * SWELL_FREQ_X).sin() * (z * SWELL_FREQ_Z).cos() * SWELL_AMPLITUDE)
    }

    /// Cast a vertical ray down from `origin`; returns the ground hit point.
    pub fn raycast_down(&self, origin: Point3<f32>, max_distance: f32) -> Option<Point3<f32>> {
        let ground = |y: f32| -> Option<f32> { self.height_at(origin.x, origin.z).map(|h| y - h) };

        let mut above = origin.y;
        if ground(above)? < 0.0 {
            // Origin already under the surface
            return None;
        }

        let floor = origin.y - max_distance;
        let mut below = above;
        loop {
            below -= MARCH_STEP;
            if below < floor {
                return None;
            }
            if ground(below)? <= 0.0 {
                break;
            }
            above = below;
        }

        for _ in 0..BISECT_ITERATIONS {
            let mid = 0.5 * (above + below);
            if ground(mid)? > 0.0 {
                above = mid;
            } else {
                below = mid;
            }
        }

        Some(Point3::new(origin.x, 0.5 * (above + below), origin.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raycast_hits_heightfield() {
        let terrain = Terrain::new(45.0);
        let hit = terrain.raycast_down(Point3::new(7.0, 50.0, -3.0), 100.0).unwrap();
        let expected = terrain.height_at(7.0, -3.0).unwrap();
        assert!((hit.y - expected).abs() < 0.01);
    }

    #[test]
    fn test_raycast_misses_outside_bounds() {
        let terrain = Terrain::new(45.0);
        assert!(terrain.raycast_down(Point3::new(60.0, 50.0, 0.0), 100.0).is_none());
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let terrain = Terrain::new(45.0);
        assert!(terrain.raycast_down(Point3::new(0.0, 50.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_ground_stays_within_swell() {
        let terrain = Terrain::new(45.0);
        for i in -9..=9 {
            let h = terrain.height_at(i as f32 * 5.0, i as f32 * -4.0).unwrap();
            assert!(h.abs() <= SWELL_AMPLITUDE + 1e-4);
        }
    }
}

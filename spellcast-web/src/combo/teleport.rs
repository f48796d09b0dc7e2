//! Blink landing search

use nalgebra::{distance, Point3, Vector3};
use rand::Rng;

use crate::config::{ArenaConfig, ComboConfig};
use crate::world::Terrain;

/// Camera pose after a blink
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlinkPose {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
}

/// Pick a random spot on the terrain away from the boss and face the boss
/// from there. `None` when every attempt was rejected.
pub fn find_landing(
    terrain: &Terrain,
    boss: Option<Point3<f32>>,
    combo: &ComboConfig,
    arena: &ArenaConfig,
    rng: &mut impl Rng,
) -> Option<BlinkPose> {
    let half = terrain.half_extent();
    if half <= 0.0 {
        return None;
    }

    for _ in 0..combo.teleport_attempts {
        let x = rng.gen_range(-half..=half);
        let z = rng.gen_range(-half..=half);
        let probe = Point3::new(x, arena.probe_height, z);
        let Some(ground) = terrain.raycast_down(probe, arena.probe_height * 2.0) else {
            continue;
        };
        if let Some(boss) = boss {
            if distance(&ground, &boss) < combo.teleport_min_boss_distance {
                continue;
            }
        }
        let eye = ground + Vector3::y() * arena.eye_height;
        let target = boss.unwrap_or_else(Point3::origin) + Vector3::y();
        return Some(BlinkPose { eye, target });
    }
    None
}

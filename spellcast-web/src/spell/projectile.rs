//! Projectile value type
//!
//! A projectile is owned by exactly one place at a time: the cast slot that
//! charges it, the aurora ball holding it, or the world's in-flight list.
//! It is not `Clone`; removing it means moving it out and dropping it.

use nalgebra::{Point3, Vector3};
use serde::Serialize;

use super::kind::{KindParams, ProjectileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectileId(pub u64);

/// Monotonic id source owned by the world
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> ProjectileId {
        self.next += 1;
        ProjectileId(self.next)
    }
}

/// Where launched projectiles head
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AimTarget {
    /// Straight at a world point (the boss root)
    Point(Point3<f32>),
    /// Fixed direction regardless of origin (camera forward)
    Direction(Vector3<f32>),
}

impl AimTarget {
    pub fn direction_from(&self, from: &Point3<f32>) -> Vector3<f32> {
        match self {
            AimTarget::Point(target) => target - from,
            AimTarget::Direction(direction) => *direction,
        }
    }
}

#[derive(Debug)]
pub struct Projectile {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    pub position: Point3<f32>,
    /// World units per reference frame; zero while charging
    pub velocity: Vector3<f32>,
    pub scale: f32,
    /// Accumulated rotation (radians) of a fully charged projectile in flight
    pub spin: f32,
    pub fully_charged: bool,
}

impl Projectile {
    pub fn new(id: ProjectileId, kind: ProjectileKind, position: Point3<f32>) -> Self {
        Self {
            id,
            kind,
            position,
            velocity: Vector3::zeros(),
            scale: kind.params().base_scale,
            spin: 0.0,
            fully_charged: false,
        }
    }

    pub fn params(&self) -> &'static KindParams {
        self.kind.params()
    }

    /// Launched projectiles move; charging ones sit at the hand
    pub fn is_launched(&self) -> bool {
        self.velocity.norm_squared() > 0.0
    }

    /// Half-extent of the projectile's bounding box
    pub fn half_extent(&self) -> f32 {
        self.params().radius * self.scale
    }

    /// Multiply scale by `factor` up to the kind's cap. Reaching the cap marks
    /// the projectile fully charged.
    pub fn grow(&mut self, factor: f32) {
        let cap = self.params().max_scale;
        if self.scale < cap {
            self.scale = (self.scale * factor).min(cap);
        }
        if self.scale >= cap {
            self.fully_charged = true;
        }
    }

    /// Start flying along `direction` at `speed` world units per reference frame
    pub fn launch(&mut self, direction: Vector3<f32>, speed: f32) {
        let direction = direction
            .try_normalize(1e-6)
            .unwrap_or_else(|| -Vector3::z());
        self.velocity = direction * speed;
    }

    pub fn launch_at(&mut self, aim: &AimTarget, speed: f32) {
        let direction = aim.direction_from(&self.position);
        self.launch(direction, speed);
    }

    pub fn position_array(&self) -> [f32; 3] {
        [self.position.x, self.position.y, self.position.z]
    }
}

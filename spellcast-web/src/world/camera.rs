//! Viewer camera and landmark unprojection
//!
//! Landmarks are mirrored horizontally (selfie view) and mapped into NDC with
//! a fixed depth band, then unprojected through the current camera so spells
//! and combo checks work in world units.

use nalgebra::{Isometry3, Perspective3, Point3, Vector3};

use crate::config::CameraConfig;
use crate::gesture::HandLandmark;

/// NDC depth of a landmark with z = 0
const LANDMARK_NDC_DEPTH: f32 = 0.7;
/// NDC depth change per unit of landmark z
const LANDMARK_DEPTH_SCALE: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    projection: Perspective3<f32>,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let [ex, ey, ez] = config.eye;
        let [tx, ty, tz] = config.target;
        Self {
            eye: Point3::new(ex, ey, ez),
            target: Point3::new(tx, ty, tz),
            projection: Perspective3::new(
                config.aspect,
                config.fov_deg.to_radians(),
                config.near,
                config.far,
            ),
        }
    }

    /// Move the camera. A target on top of the eye is ignored.
    pub fn set_pose(&mut self, eye: Point3<f32>, target: Point3<f32>) {
        if (target - eye).norm() < 1e-4 {
            self.target = eye + self.forward();
        } else {
            self.target = target;
        }
        self.eye = eye;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.projection.set_aspect(aspect);
        }
    }

    pub fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye, &self.target, &Vector3::y())
    }

    /// Unit view direction
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.eye)
            .try_normalize(1e-6)
            .unwrap_or_else(|| -Vector3::z())
    }

    /// Mirrored NDC position of a normalized landmark
    pub fn landmark_ndc(landmark: &HandLandmark) -> Point3<f32> {
        Point3::new(
            ((1.0 - landmark.x) - 0.5) * 2.0,
            -(landmark.y - 0.5) * 2.0,
            LANDMARK_NDC_DEPTH - landmark.z * LANDMARK_DEPTH_SCALE,
        )
    }

    pub fn unproject(&self, ndc: &Point3<f32>) -> Point3<f32> {
        let in_view = self.projection.unproject_point(ndc);
        self.view().inverse_transform_point(&in_view)
    }

    /// World NDC of a point (x, y in [-1, 1] when on screen)
    pub fn project(&self, world: &Point3<f32>) -> Point3<f32> {
        let in_view = self.view().transform_point(world);
        self.projection.project_point(&in_view)
    }

    pub fn landmark_to_world(&self, landmark: &HandLandmark) -> Point3<f32> {
        self.unproject(&Self::landmark_ndc(landmark))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

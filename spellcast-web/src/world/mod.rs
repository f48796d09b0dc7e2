//! World module - camera, arena terrain and the per-frame world update
//!
//! Re-exports only. All logic in submodules.

mod camera;
mod snapshot;
mod state;
mod terrain;

pub use camera::Camera;
pub use snapshot::{
    BossView, CameraView, CooldownView, DamageTextView, MarkerView, ParticleView, ProjectileView,
    WorldSnapshot,
};
pub use state::{reference_frames, World, REFERENCE_FRAME};
pub use terrain::Terrain;

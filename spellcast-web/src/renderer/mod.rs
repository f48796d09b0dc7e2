//! Renderer module - WebGPU debug overlay (wasm only)
//!
//! Re-exports only. All logic in submodules.

mod overlay;
mod shapes;
mod state;

pub use overlay::render_frame;
pub use state::{initialize_gpu, GpuStateError};

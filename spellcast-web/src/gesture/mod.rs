//! Gesture module - landmark layout and pose classification
//!
//! Re-exports only. All logic in submodules.

mod classifier;
mod landmarks;

pub use classifier::{classify, classify_opt, extended_fingers, readout, Gesture};
pub use landmarks::{
    parse_hand, HandLandmark, HandLandmarks, HandSlot, HandsInput, FLOATS_PER_HAND,
    HAND_SKELETON, INDEX_MCP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_TIP, PALM,
    PINKY_MCP, PINKY_TIP, RING_MCP, RING_TIP, THUMB_TIP, WRIST,
};

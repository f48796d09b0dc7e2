//! Hand landmark layout (MediaPipe Hands - 21 per hand)
//!
//! Coordinates are normalized camera space: x and y in [0, 1] with y growing
//! downward, z relative depth (smaller = closer to the camera).

use serde::Serialize;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// Floats per hand in the flat buffer handed over by JS (x, y, z per joint)
pub const FLOATS_PER_HAND: usize = LANDMARK_COUNT * 3;

/// Spells anchor on the wrist; MediaPipe has no dedicated palm-center joint
pub const PALM: usize = WRIST;

/// Hand skeleton connections for rendering (fingers + palm outline)
pub const HAND_SKELETON: [(usize, usize); 24] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, RING_MCP), (RING_MCP, PINKY_MCP), (INDEX_MCP, PINKY_MCP),
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single tracked joint
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HandLandmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One detected hand for one frame
pub type HandLandmarks = [HandLandmark; LANDMARK_COUNT];

/// Which tracked hand (estimator output order, not anatomical side)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HandSlot {
    First,
    Second,
}

impl HandSlot {
    pub const BOTH: [HandSlot; 2] = [HandSlot::First, HandSlot::Second];

    pub fn index(&self) -> usize {
        match self {
            HandSlot::First => 0,
            HandSlot::Second => 1,
        }
    }
}

/// Per-frame landmark input: `None` when the hand is not tracked
pub type HandsInput = [Option<HandLandmarks>; 2];

/// Read one hand out of a flat `[x, y, z, x, y, z, ...]` buffer.
/// Returns `None` if the buffer is too short to hold that hand.
pub fn parse_hand(flat: &[f32], hand: usize) -> Option<HandLandmarks> {
    let base = hand * FLOATS_PER_HAND;
    let data = flat.get(base..base + FLOATS_PER_HAND)?;

    let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
    for (i, joint) in landmarks.iter_mut().enumerate() {
        *joint = HandLandmark::new(data[i * 3], data[i * 3 + 1], data[i * 3 + 2]);
    }
    Some(landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_second_hand() {
        let mut flat = vec![0.0; FLOATS_PER_HAND * 2];
        let base = FLOATS_PER_HAND + INDEX_TIP * 3;
        flat[base] = 0.25;
        flat[base + 1] = 0.5;
        flat[base + 2] = -0.1;

        let hand = parse_hand(&flat, 1).unwrap();
        assert_eq!(hand[INDEX_TIP], HandLandmark::new(0.25, 0.5, -0.1));
    }

    #[test]
    fn test_parse_short_buffer() {
        let flat = vec![0.0; FLOATS_PER_HAND + 3];
        assert!(parse_hand(&flat, 0).is_some());
        assert!(parse_hand(&flat, 1).is_none());
    }
}

//! Rule-based hand pose classification
//!
//! Compares each fingertip's height against its knuckle. Only the vertical
//! axis is used and the thumb is ignored, so the rules hold for either hand.

use serde::Serialize;

use super::landmarks::{
    HandLandmarks, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP, RING_MCP,
    RING_TIP,
};

/// Recognized hand poses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Gesture {
    /// All four fingers extended
    OpenPalm,
    /// Index and middle extended
    Victory,
    /// Index alone extended
    FingerOne,
    /// No finger extended
    Fist,
}

impl Gesture {
    /// Text shown in the gesture readout
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::OpenPalm => "Open Palm",
            Gesture::Victory => "Victory ✌️",
            Gesture::FingerOne => "Finger One ☝️",
            Gesture::Fist => "Fist ✊",
        }
    }
}

/// (tip, knuckle) for index, middle, ring, pinky
const FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_MCP),
    (RING_TIP, RING_MCP),
    (PINKY_TIP, PINKY_MCP),
];

/// Which fingers point up (screen y grows downward)
pub fn extended_fingers(hand: &HandLandmarks) -> [bool; 4] {
    FINGERS.map(|(tip, knuckle)| hand[tip].y < hand[knuckle].y)
}

/// Classify one hand. Combinations outside the four poses give `None`.
pub fn classify(hand: &HandLandmarks) -> Option<Gesture> {
    match extended_fingers(hand) {
        [true, true, true, true] => Some(Gesture::OpenPalm),
        [true, true, false, false] => Some(Gesture::Victory),
        [true, false, false, false] => Some(Gesture::FingerOne),
        [false, false, false, false] => Some(Gesture::Fist),
        _ => None,
    }
}

/// Classify an optional hand; untracked hands have no gesture
pub fn classify_opt(hand: Option<&HandLandmarks>) -> Option<Gesture> {
    hand.and_then(classify)
}

/// Readout text for both hands, e.g. `"Victory ✌️ | Open Palm"`
pub fn readout(gestures: &[Option<Gesture>; 2]) -> String {
    gestures
        .iter()
        .flatten()
        .map(Gesture::label)
        .collect::<Vec<_>>()
        .join(" | ")
}

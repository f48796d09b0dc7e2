//! Latest hand landmarks pushed by the tracker
//!
//! JS calls `apply_hand_landmarks` whenever the tracker produces a result.
//! The game reads whatever is here on its next tick. A malformed buffer is
//! rejected and the previous landmarks stay.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::error::BridgeError;
use crate::gesture::{parse_hand, HandsInput, FLOATS_PER_HAND};

/// Hands the game can track at once
const MAX_HANDS: usize = 2;

#[derive(Default)]
pub(crate) struct HandFeed {
    latest: HandsInput,
    /// Frames received since startup
    received: u64,
}

impl HandFeed {
    pub fn latest(&self) -> HandsInput {
        self.latest
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Replace the stored hands with `flat` (21 x/y/z triples per hand)
    pub fn apply(&mut self, flat: &[f32], num_hands: usize) -> Result<(), BridgeError> {
        self.latest = parse_hands(flat, num_hands)?;
        self.received += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.latest = [None, None];
    }
}

/// Split a flat tracker buffer into per-hand landmarks
pub(crate) fn parse_hands(flat: &[f32], num_hands: usize) -> Result<HandsInput, BridgeError> {
    if num_hands > MAX_HANDS {
        log::debug!("tracker sent {} hands, using the first {}", num_hands, MAX_HANDS);
    }
    let hands = num_hands.min(MAX_HANDS);
    let expected = hands * FLOATS_PER_HAND;
    if flat.len() < expected {
        return Err(BridgeError::InvalidLandmarkData {
            len: flat.len(),
            hands,
            expected,
        });
    }

    let mut input: HandsInput = [None, None];
    for (i, slot) in input.iter_mut().enumerate().take(hands) {
        *slot = parse_hand(flat, i);
    }
    Ok(input)
}

thread_local! {
    static HAND_FEED: RefCell<HandFeed> = RefCell::new(HandFeed::default());
}

/// Snapshot of the stored hands for the next tick
pub(crate) fn latest_hands() -> HandsInput {
    HAND_FEED.with(|feed| feed.borrow().latest())
}

pub(crate) fn frames_received() -> u64 {
    HAND_FEED.with(|feed| feed.borrow().received())
}

// ============================================================================
// WASM API
// ============================================================================

/// Store the newest tracker output
#[wasm_bindgen]
pub fn apply_hand_landmarks(flat_data: &[f32], num_hands: usize) {
    HAND_FEED.with(|feed| {
        if let Err(err) = feed.borrow_mut().apply(flat_data, num_hands) {
            log::warn!("ignoring landmarks: {}", err);
        }
    });
}

/// Tracker lost both hands
#[wasm_bindgen]
pub fn mark_hands_absent() {
    HAND_FEED.with(|feed| feed.borrow_mut().clear());
}

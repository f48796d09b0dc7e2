//! Synthetic tracker poses and a fixed-step driver for `World`

#![allow(dead_code)]

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use spellcast_web::effects::EffectEvent;
use spellcast_web::gesture::{
    Gesture, HandLandmark, HandLandmarks, HandsInput, INDEX_MCP, INDEX_TIP, LANDMARK_COUNT,
    MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP, RING_MCP, RING_TIP, THUMB_TIP, WRIST,
};
use spellcast_web::world::World;

pub const FRAME: Duration = Duration::from_millis(16);

/// A hand whose knuckles sit at `(x, y)` in normalized image space.
/// `up` lists index, middle, ring and pinky.
pub fn hand(up: [bool; 4], x: f32, y: f32) -> HandLandmarks {
    let mut hand = [HandLandmark::new(x, y, 0.0); LANDMARK_COUNT];
    hand[WRIST] = HandLandmark::new(x, y + 0.15, 0.0);
    let fingers = [
        (INDEX_TIP, INDEX_MCP),
        (MIDDLE_TIP, MIDDLE_MCP),
        (RING_TIP, RING_MCP),
        (PINKY_TIP, PINKY_MCP),
    ];
    for ((tip, knuckle), extended) in fingers.into_iter().zip(up) {
        hand[knuckle] = HandLandmark::new(x, y, 0.0);
        hand[tip] = HandLandmark::new(x, if extended { y - 0.1 } else { y + 0.05 }, 0.0);
    }
    hand[THUMB_TIP] = HandLandmark::new(x + 0.06, y + 0.02, 0.0);
    hand
}

pub fn posed(gesture: Gesture, x: f32, y: f32) -> HandLandmarks {
    let up = match gesture {
        Gesture::OpenPalm => [true, true, true, true],
        Gesture::Victory => [true, true, false, false],
        Gesture::FingerOne => [true, false, false, false],
        Gesture::Fist => [false, false, false, false],
    };
    hand(up, x, y)
}

/// Ring finger alone: classifies to no gesture
pub fn unposed(x: f32, y: f32) -> HandLandmarks {
    hand([false, false, true, false], x, y)
}

pub fn with_thumb(mut hand: HandLandmarks, x: f32, y: f32) -> HandLandmarks {
    hand[THUMB_TIP] = HandLandmark::new(x, y, 0.0);
    hand
}

/// Moves the index tip while keeping it below its knuckle
pub fn with_index(mut hand: HandLandmarks, x: f32, y: f32) -> HandLandmarks {
    hand[INDEX_TIP] = HandLandmark::new(x, y.max(hand[INDEX_MCP].y + 0.01), 0.0);
    hand
}

pub fn one(hand: HandLandmarks) -> HandsInput {
    [Some(hand), None]
}

pub fn two(first: HandLandmarks, second: HandLandmarks) -> HandsInput {
    [Some(first), Some(second)]
}

pub struct Driver {
    pub world: World,
    pub rng: StdRng,
    pub events: Vec<EffectEvent>,
    pub frame: Duration,
}

impl Driver {
    pub fn new(world: World) -> Self {
        Self::with_frame(world, FRAME)
    }

    /// Drive at a display rate other than the default step
    pub fn with_frame(world: World, frame: Duration) -> Self {
        Self {
            world,
            rng: StdRng::seed_from_u64(17),
            events: Vec::new(),
            frame,
        }
    }

    /// Step the same input until at least `length` of world time has passed
    pub fn run_for(&mut self, input: &HandsInput, length: Duration) {
        let until = self.world.clock() + length;
        while self.world.clock() < until {
            self.step(input);
        }
    }

    /// Step `frames` fixed frames with the same input
    pub fn run(&mut self, input: &HandsInput, frames: usize) {
        for _ in 0..frames {
            self.step(input);
        }
    }

    pub fn step(&mut self, input: &HandsInput) {
        self.world.update(input, self.frame, &mut self.rng);
        self.events.extend(self.world.drain_events());
    }

    /// Step until `done` matches a new event, at most `limit` frames
    pub fn run_until(
        &mut self,
        input: &HandsInput,
        limit: usize,
        done: impl Fn(&EffectEvent) -> bool,
    ) -> bool {
        for _ in 0..limit {
            let seen = self.events.len();
            self.step(input);
            if self.events[seen..].iter().any(&done) {
                return true;
            }
        }
        false
    }

    pub fn count(&self, pred: impl Fn(&EffectEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

//! Floating damage numbers

use std::time::Duration;

use nalgebra::Point3;

/// Rise per reference frame
const RISE_PER_FRAME: f32 = 0.012;

#[derive(Clone, Debug)]
pub struct DamageText {
    pub amount: u32,
    pub position: Point3<f32>,
    age: Duration,
    life: Duration,
}

impl DamageText {
    pub fn opacity(&self) -> f32 {
        let life = self.life.as_secs_f32();
        if life <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age.as_secs_f32() / life).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DamageTexts {
    texts: Vec<DamageText>,
}

impl DamageTexts {
    pub fn spawn(&mut self, amount: u32, at: Point3<f32>, life: Duration) {
        self.texts.push(DamageText {
            amount,
            position: at,
            age: Duration::ZERO,
            life,
        });
    }

    pub fn update(&mut self, dt: Duration, frames: f32) {
        for text in &mut self.texts {
            text.position.y += RISE_PER_FRAME * frames;
            text.age += dt;
        }
        self.texts.retain(|t| t.age <= t.life);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DamageText> {
        self.texts.iter()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

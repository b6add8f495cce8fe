//! Boost pads: pickup and cooldown

use serde::Serialize;

use super::body::{CarBody, FULL_BOOST};
use super::field::{CAR_RADIUS, FIELD, PAD_COOLDOWN, PAD_RADIUS};

/// Below this a pad tops up by `PAD_TOP_UP`; at or above it fills the tank
const PAD_TOP_UP_THRESHOLD: f32 = 50.0;
const PAD_TOP_UP: f32 = 50.0;

pub const PAD_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pad {
    pub x: f32,
    pub y: f32,
    /// Seconds until reusable; 0 means available
    #[serde(rename = "t")]
    pub cooldown: f32,
}

impl Pad {
    const fn at(x: f32, y: f32) -> Self {
        Self { x, y, cooldown: 0.0 }
    }

    pub fn is_available(&self) -> bool {
        self.cooldown <= 0.0
    }
}

/// The fixed pad layout and their cooldowns
#[derive(Debug, Clone, PartialEq)]
pub struct BoostPadField {
    pads: [Pad; PAD_COUNT],
}

impl BoostPadField {
    pub fn new() -> Self {
        Self {
            pads: [
                Pad::at(FIELD.mx, FIELD.t + 80.0),
                Pad::at(FIELD.mx, FIELD.b - 80.0),
                Pad::at(FIELD.l + 140.0, FIELD.my - 120.0),
                Pad::at(FIELD.l + 140.0, FIELD.my + 120.0),
                Pad::at(FIELD.r - 140.0, FIELD.my - 120.0),
                Pad::at(FIELD.r - 140.0, FIELD.my + 120.0),
            ],
        }
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Count cooldowns down toward zero
    pub fn tick(&mut self, dt: f32) {
        for pad in &mut self.pads {
            if pad.cooldown > 0.0 {
                pad.cooldown = (pad.cooldown - dt).max(0.0);
            }
        }
    }

    /// Grant boost from every available pad the car is touching.
    /// Returns the number of pads consumed.
    pub fn try_pickup(&mut self, car: &mut CarBody) -> usize {
        let mut taken = 0;
        for pad in &mut self.pads {
            if !pad.is_available() {
                continue;
            }
            if (car.x - pad.x).hypot(car.y - pad.y) <= CAR_RADIUS + PAD_RADIUS {
                car.boost = if car.boost < PAD_TOP_UP_THRESHOLD {
                    (car.boost + PAD_TOP_UP).min(FULL_BOOST)
                } else {
                    FULL_BOOST
                };
                pad.cooldown = PAD_COOLDOWN;
                taken += 1;
            }
        }
        taken
    }

    /// Every pad available again
    pub fn reset(&mut self) {
        for pad in &mut self.pads {
            pad.cooldown = 0.0;
        }
    }
}

impl Default for BoostPadField {
    fn default() -> Self {
        Self::new()
    }
}

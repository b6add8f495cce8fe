//! Kinematic state for cars and the ball

use serde::Serialize;
use std::f32::consts::PI;

use super::field::FIELD;

const SPAWN_OFFSET_X: f32 = 220.0;
pub const FULL_BOOST: f32 = 100.0;

/// Team side. Blue is seated at p1 and defends the left goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Blue,
    Red,
}

/// Car state. Field names on the wire follow the browser client (`a`, `av`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarBody {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Heading in radians
    #[serde(rename = "a")]
    pub heading: f32,
    /// Yaw rate in radians per second
    #[serde(rename = "av")]
    pub yaw_rate: f32,
    /// Boost in [0, 100]
    pub boost: f32,
    /// Set only during the step in which boost was burned
    pub boosting: bool,
}

impl CarBody {
    /// Kickoff pose for a side; the two poses mirror each other across the center line
    pub fn spawn(side: Side) -> Self {
        let (x, heading) = match side {
            Side::Blue => (FIELD.mx - SPAWN_OFFSET_X, 0.0),
            Side::Red => (FIELD.mx + SPAWN_OFFSET_X, PI),
        };
        Self {
            x,
            y: FIELD.my,
            vx: 0.0,
            vy: 0.0,
            heading,
            yaw_rate: 0.0,
            boost: FULL_BOOST,
            boosting: false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallBody {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Accumulated roll for rendering; physics never reads it
    pub spin: f32,
}

impl BallBody {
    pub fn centered() -> Self {
        Self {
            x: FIELD.mx,
            y: FIELD.my,
            vx: 0.0,
            vy: 0.0,
            spin: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_poses_are_mirrored() {
        let blue = CarBody::spawn(Side::Blue);
        let red = CarBody::spawn(Side::Red);
        assert_eq!(blue.x + red.x, 2.0 * FIELD.mx);
        assert_eq!(blue.y, red.y);
        assert_eq!(red.heading - blue.heading, PI);
        assert_eq!(blue.boost, FULL_BOOST);
        assert_eq!(blue.speed(), 0.0);
    }

    #[test]
    fn car_serializes_with_client_field_names() {
        let json = serde_json::to_value(CarBody::spawn(Side::Blue)).unwrap();
        assert!(json.get("a").is_some());
        assert!(json.get("av").is_some());
        assert_eq!(json["boost"], 100.0);
        assert_eq!(json["boosting"], false);
    }
}

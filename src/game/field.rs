//! Pitch geometry and fixture sizes

use serde::Serialize;

pub const CAR_RADIUS: f32 = 18.0;
pub const BALL_RADIUS: f32 = 25.0;
pub const PAD_RADIUS: f32 = 14.0;
/// Seconds a pad stays unusable after a pickup
pub const PAD_COOLDOWN: f32 = 3.0;

const CANVAS_W: f32 = 980.0;
const CANVAS_H: f32 = 560.0;
const UI_TOP: f32 = 44.0;
const UI_BOTTOM: f32 = 56.0;
const UI_SIDE: f32 = 40.0;

/// Playable rectangle. `mx`/`my` is the center spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldBounds {
    pub l: f32,
    pub r: f32,
    pub t: f32,
    pub b: f32,
    pub mx: f32,
    pub my: f32,
}

/// Goal mouth width (`w`, along y) and depth behind the goal line (`d`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalGeometry {
    pub w: f32,
    pub d: f32,
}

pub const FIELD: FieldBounds = FieldBounds {
    l: UI_SIDE,
    r: CANVAS_W - UI_SIDE,
    t: UI_TOP,
    b: CANVAS_H - UI_BOTTOM,
    mx: CANVAS_W / 2.0,
    my: (UI_TOP + (CANVAS_H - UI_BOTTOM)) / 2.0,
};

pub const GOAL: GoalGeometry = GoalGeometry { w: 160.0, d: 60.0 };

impl FieldBounds {
    /// Clip a point so a circle of `radius` centered there stays on the pitch
    pub fn clamp_inside(&self, x: f32, y: f32, radius: f32) -> (f32, f32) {
        (
            x.clamp(self.l + radius, self.r - radius),
            y.clamp(self.t + radius, self.b - radius),
        )
    }

    /// Strictly between the posts on the y axis
    pub fn in_goal_mouth(&self, y: f32) -> bool {
        y > self.my - GOAL.w / 2.0 && y < self.my + GOAL.w / 2.0
    }

    #[cfg(test)]
    pub fn contains(&self, x: f32, y: f32, radius: f32) -> bool {
        x >= self.l + radius && x <= self.r - radius && y >= self.t + radius && y <= self.b - radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_matches_canvas_layout() {
        assert_eq!(FIELD.l, 40.0);
        assert_eq!(FIELD.r, 940.0);
        assert_eq!(FIELD.t, 44.0);
        assert_eq!(FIELD.b, 504.0);
        assert_eq!(FIELD.mx, 490.0);
        assert_eq!(FIELD.my, 274.0);
    }

    #[test]
    fn clamp_keeps_circle_inside() {
        let (x, y) = FIELD.clamp_inside(-100.0, 10_000.0, CAR_RADIUS);
        assert_eq!(x, FIELD.l + CAR_RADIUS);
        assert_eq!(y, FIELD.b - CAR_RADIUS);
        assert!(FIELD.contains(x, y, CAR_RADIUS));
    }

    #[test]
    fn goal_mouth_excludes_posts() {
        assert!(FIELD.in_goal_mouth(FIELD.my));
        assert!(!FIELD.in_goal_mouth(FIELD.my + GOAL.w / 2.0));
        assert!(!FIELD.in_goal_mouth(FIELD.t + 1.0));
    }
}

//! Control input record and its construction from untrusted client JSON

use serde_json::Value;

/// One control sample for a car. Always within range once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInput {
    /// -1.0 = full left, 1.0 = full right
    pub steer: f32,
    pub accel: bool,
    /// Throttle pressure in [0, 1]
    pub accel_amt: f32,
    pub brake: bool,
    /// Brake pressure in [0, 1]
    pub brake_amt: f32,
    pub drift: bool,
    pub boost: bool,
}

impl ControlInput {
    /// Neutral input: no steer, no pedals
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Build from the `i` object of an `input` message.
    ///
    /// Never fails: missing or malformed fields fall back to their defaults,
    /// numbers are clamped, unknown keys are ignored.
    pub fn from_untrusted(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::neutral();
        };

        let flag = |key: &str| obj.get(key).map(truthy).unwrap_or(false);
        let number = |key: &str| obj.get(key).and_then(as_finite_f32);

        let accel = flag("accel");
        let brake = flag("brake");

        Self {
            steer: number("steer").unwrap_or(0.0).clamp(-1.0, 1.0),
            accel,
            accel_amt: number("accelAmt")
                .unwrap_or(if accel { 1.0 } else { 0.0 })
                .clamp(0.0, 1.0),
            brake,
            brake_amt: number("brakeAmt")
                .unwrap_or(if brake { 1.0 } else { 0.0 })
                .clamp(0.0, 1.0),
            drift: flag("drift"),
            boost: flag("boost"),
        }
    }
}

/// Browser-style truthiness for button fields
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

fn as_finite_f32(value: &Value) -> Option<f32> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_is_neutral() {
        assert_eq!(ControlInput::from_untrusted(&Value::Null), ControlInput::neutral());
        assert_eq!(ControlInput::from_untrusted(&json!(42)), ControlInput::neutral());
        assert_eq!(ControlInput::from_untrusted(&json!([1, 2])), ControlInput::neutral());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let input = ControlInput::from_untrusted(&json!({
            "steer": 7.5,
            "accel": true,
            "accelAmt": 3.0,
            "brake": true,
            "brakeAmt": -2.0,
        }));
        assert_eq!(input.steer, 1.0);
        assert_eq!(input.accel_amt, 1.0);
        assert_eq!(input.brake_amt, 0.0);
    }

    #[test]
    fn pedal_amount_defaults_follow_flags() {
        let input = ControlInput::from_untrusted(&json!({ "accel": true }));
        assert!(input.accel);
        assert_eq!(input.accel_amt, 1.0);
        assert!(!input.brake);
        assert_eq!(input.brake_amt, 0.0);
    }

    #[test]
    fn coerces_loose_types_and_ignores_unknown_fields() {
        let input = ControlInput::from_untrusted(&json!({
            "steer": "-0.5",
            "drift": 1,
            "boost": "yes",
            "accel": 0,
            "teleport": true,
        }));
        assert_eq!(input.steer, -0.5);
        assert!(input.drift);
        assert!(input.boost);
        assert!(!input.accel);
    }

    #[test]
    fn garbage_numbers_fall_back_to_defaults() {
        let input = ControlInput::from_untrusted(&json!({
            "steer": "left",
            "accel": true,
            "accelAmt": null,
        }));
        assert_eq!(input.steer, 0.0);
        assert_eq!(input.accel_amt, 1.0);
    }
}

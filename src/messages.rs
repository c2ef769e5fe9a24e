// Message types on the bus: joystick state in, velocity command out

use serde::{Deserialize, Serialize};

// Raw joystick state from the joy driver -> teleop
// Same layout as sensor_msgs/Joy: axes in [-1, 1], buttons 0 (released) or 1 (pressed)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoystickState {
    #[serde(default)]
    pub axes: Vec<f32>,
    #[serde(default)]
    pub buttons: Vec<i32>,
}

impl JoystickState {
    pub fn new(axes: Vec<f32>, buttons: Vec<i32>) -> Self {
        Self { axes, buttons }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity command from teleop -> motion controller
///
/// Only `linear.x` (forward speed) and `angular.z` (turn rate) are used by the
/// car; the other four fields stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl Twist {
    /// Build a planar command: forward speed and yaw rate
    pub fn planar(linear_x: f64, angular_z: f64) -> Self {
        Self {
            linear: Vector3 {
                x: linear_x,
                ..Vector3::default()
            },
            angular: Vector3 {
                z: angular_z,
                ..Vector3::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joystick_state_from_json() {
        let joy: JoystickState =
            serde_json::from_str(r#"{"axes":[0.0,0.5,0.0,-1.0],"buttons":[0,1,0]}"#).unwrap();
        assert_eq!(joy.axes, vec![0.0, 0.5, 0.0, -1.0]);
        assert_eq!(joy.buttons, vec![0, 1, 0]);
    }

    #[test]
    fn test_joystick_state_missing_fields_are_empty() {
        let joy: JoystickState = serde_json::from_str(r#"{"axes":[1.0]}"#).unwrap();
        assert_eq!(joy.axes, vec![1.0]);
        assert!(joy.buttons.is_empty());
    }

    #[test]
    fn test_planar_twist_leaves_other_fields_zero() {
        let twist = Twist::planar(0.3, -0.9);
        assert_eq!(twist.linear.x, 0.3);
        assert_eq!(twist.angular.z, -0.9);
        assert_eq!(twist.linear.y, 0.0);
        assert_eq!(twist.linear.z, 0.0);
        assert_eq!(twist.angular.x, 0.0);
        assert_eq!(twist.angular.y, 0.0);
    }

    #[test]
    fn test_twist_json_shape() {
        let json = serde_json::to_value(Twist::planar(0.3, 0.0)).unwrap();
        assert_eq!(json["linear"]["x"], 0.3);
        assert_eq!(json["angular"]["z"], 0.0);
        assert_eq!(json["linear"]["y"], 0.0);
    }
}

// Joystick -> velocity command translation
//
// A pure, memoryless mapping: two axes scaled into forward speed and turn
// rate, overridden by the emergency brake buttons. No deadzone, smoothing or
// rate limiting.

use tracing::{debug, info, warn};

use crate::config::TeleopConfig;
use crate::messages::{JoystickState, Twist};

/// Reasons a single joystick message is rejected
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("Axis {index} missing (message has {len} axes)")]
    MissingAxis { index: usize, len: usize },

    #[error("Button {index} missing (message has {len} buttons)")]
    MissingButton { index: usize, len: usize },

    #[error("Axis {index} is not finite: {value}")]
    NonFiniteAxis { index: usize, value: f32 },
}

fn button(joy: &JoystickState, index: usize) -> Result<i32, InputError> {
    joy.buttons
        .get(index)
        .copied()
        .ok_or(InputError::MissingButton {
            index,
            len: joy.buttons.len(),
        })
}

fn axis(joy: &JoystickState, index: usize) -> Result<f64, InputError> {
    let value = *joy.axes.get(index).ok_or(InputError::MissingAxis {
        index,
        len: joy.axes.len(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NonFiniteAxis { index, value });
    }
    Ok(f64::from(value))
}

/// True if any brake button reads the configured trigger value
///
/// Literal equality against `brake_trigger`: the flag (always 1 on the F710
/// setup) is compared with each brake button. With the default trigger this
/// means "either button pressed"; a reading of 2 or -1 does not brake.
/// Every brake button is checked, so a pressed one wins over a missing one
/// regardless of order. `MissingButton` is returned only when none matched.
pub fn brake_engaged(joy: &JoystickState, config: &TeleopConfig) -> Result<bool, InputError> {
    let mut missing = None;
    for &index in &config.brake_buttons {
        match button(joy, index) {
            Ok(value) if value == config.brake_trigger => return Ok(true),
            Ok(_) => {}
            Err(e) => {
                missing.get_or_insert(e);
            }
        }
    }
    match missing {
        Some(e) => Err(e),
        None => Ok(false),
    }
}

/// Translate one joystick message into one velocity command
///
/// Braking backs the car off at `-scale_linear` with zero turn, whatever the
/// sticks say. The axes are only read when no brake button is held.
pub fn translate(joy: &JoystickState, config: &TeleopConfig) -> Result<Twist, InputError> {
    let braking = brake_engaged(joy, config)?;
    drive(joy, config, braking)
}

fn drive(joy: &JoystickState, config: &TeleopConfig, braking: bool) -> Result<Twist, InputError> {
    if braking {
        return Ok(Twist::planar(-config.scale_linear, 0.0));
    }

    let angular = config.scale_angular * axis(joy, config.axis_angular)?;
    let linear = config.scale_linear * axis(joy, config.axis_linear)?;
    Ok(Twist::planar(linear, angular))
}

/// Translator context: configuration plus the last emitted command
pub struct Teleop {
    config: TeleopConfig,
    last_command: Option<Twist>,
    braking: bool,
}

impl Teleop {
    pub fn new(config: TeleopConfig) -> Self {
        Self {
            config,
            last_command: None,
            braking: false,
        }
    }

    /// Process one joystick message
    ///
    /// On success the command is cached and returned for publishing. A
    /// rejected message leaves the cache untouched.
    pub fn on_joy(&mut self, joy: &JoystickState) -> Result<Twist, InputError> {
        let braking = brake_engaged(joy, &self.config)?;
        let twist = drive(joy, &self.config, braking)?;

        if braking != self.braking {
            if braking {
                warn!("Emergency brake engaged");
            } else {
                info!("Emergency brake released");
            }
            self.braking = braking;
        }

        debug!(
            "Joy -> linear.x={:.3}, angular.z={:.3}",
            twist.linear.x, twist.angular.z
        );
        self.last_command = Some(twist);
        Ok(twist)
    }

    /// Last command emitted, if any message has been translated yet
    pub fn last_command(&self) -> Option<&Twist> {
        self.last_command.as_ref()
    }

    pub fn is_braking(&self) -> bool {
        self.braking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn joy(axes: &[f32], buttons: &[i32]) -> JoystickState {
        JoystickState::new(axes.to_vec(), buttons.to_vec())
    }

    fn assert_twist(twist: &Twist, linear: f64, angular: f64) {
        assert!(
            (twist.linear.x - linear).abs() < EPS,
            "linear.x = {}, expected {}",
            twist.linear.x,
            linear
        );
        assert!(
            (twist.angular.z - angular).abs() < EPS,
            "angular.z = {}, expected {}",
            twist.angular.z,
            angular
        );
        assert_eq!(twist.linear.y, 0.0);
        assert_eq!(twist.linear.z, 0.0);
        assert_eq!(twist.angular.x, 0.0);
        assert_eq!(twist.angular.y, 0.0);
    }

    #[test]
    fn test_forward_full_stick() {
        let twist = translate(
            &joy(&[0.0, 0.0, 0.0, 1.0], &[0, 0, 0, 0, 0, 0]),
            &TeleopConfig::default(),
        )
        .unwrap();
        assert_twist(&twist, 0.3, 0.0);
    }

    #[test]
    fn test_brake_overrides_forward() {
        let twist = translate(
            &joy(&[0.0, 0.0, 0.0, 1.0], &[0, 0, 0, 0, 1, 0]),
            &TeleopConfig::default(),
        )
        .unwrap();
        assert_twist(&twist, -0.3, 0.0);
    }

    #[test]
    fn test_reverse_and_turn() {
        let twist = translate(
            &joy(&[-1.0, 0.0, 0.0, -1.0], &[0, 0, 0, 0, 0, 0]),
            &TeleopConfig::default(),
        )
        .unwrap();
        assert_twist(&twist, -0.3, -0.9);
    }

    #[test]
    fn test_scaling_across_stick_range() {
        let config = TeleopConfig::default();
        let values = [-1.0f32, -0.75, -0.2, 0.0, 0.4, 0.99, 1.0];
        for &a in &values {
            for &b in &values {
                let twist = translate(&joy(&[a, 0.0, 0.0, b], &[0; 6]), &config).unwrap();
                assert_twist(&twist, 0.3 * b as f64, 0.9 * a as f64);
            }
        }
    }

    #[test]
    fn test_brake_ignores_axes() {
        let config = TeleopConfig::default();
        for axes in [[1.0f32, 0.0, 0.0, 1.0], [-1.0, 0.5, 0.5, -1.0], [0.0; 4]] {
            for buttons in [[0, 0, 0, 0, 1, 0], [0, 0, 0, 0, 0, 1], [0, 0, 0, 0, 1, 1]] {
                let twist = translate(&joy(&axes, &buttons), &config).unwrap();
                assert_twist(&twist, -0.3, 0.0);
            }
        }
    }

    #[test]
    fn test_other_buttons_do_not_brake() {
        let twist = translate(
            &joy(&[0.0, 0.0, 0.0, 1.0], &[1, 1, 1, 1, 0, 0, 1, 1]),
            &TeleopConfig::default(),
        )
        .unwrap();
        assert_twist(&twist, 0.3, 0.0);
    }

    #[test]
    fn test_brake_trigger_is_literal_equality() {
        // Only the configured value counts; other non-zero readings do not brake
        let config = TeleopConfig::default();
        let twist = translate(&joy(&[0.0, 0.0, 0.0, 1.0], &[0, 0, 0, 0, 2, -1]), &config).unwrap();
        assert_twist(&twist, 0.3, 0.0);

        let released_trigger = TeleopConfig {
            brake_trigger: 0,
            ..TeleopConfig::default()
        };
        let twist = translate(&joy(&[0.0, 0.0, 0.0, 1.0], &[0; 6]), &released_trigger).unwrap();
        assert_twist(&twist, -0.3, 0.0);
    }

    #[test]
    fn test_zero_linear_scale_never_moves() {
        let config = TeleopConfig {
            scale_linear: 0.0,
            ..TeleopConfig::default()
        };
        let driving = translate(&joy(&[0.5, 0.0, 0.0, 1.0], &[0; 6]), &config).unwrap();
        let braking = translate(&joy(&[0.5, 0.0, 0.0, 1.0], &[0, 0, 0, 0, 1, 0]), &config).unwrap();
        assert_eq!(driving.linear.x, 0.0);
        assert_eq!(braking.linear.x, 0.0);
    }

    #[test]
    fn test_same_input_same_output() {
        let mut teleop = Teleop::new(TeleopConfig::default());
        let msg = joy(&[0.3, 0.0, 0.0, -0.7], &[0; 6]);
        let first = teleop.on_joy(&msg).unwrap();
        let second = teleop.on_joy(&msg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_axes_rejected() {
        let err = translate(&joy(&[0.0, 0.0], &[0; 6]), &TeleopConfig::default()).unwrap_err();
        assert_eq!(err, InputError::MissingAxis { index: 3, len: 2 });
    }

    #[test]
    fn test_short_buttons_rejected() {
        let err = translate(&joy(&[0.0; 4], &[0, 0, 0, 0, 0]), &TeleopConfig::default())
            .unwrap_err();
        assert_eq!(err, InputError::MissingButton { index: 5, len: 5 });
    }

    #[test]
    fn test_brake_order_does_not_matter_with_short_buttons() {
        // buttons[5] is absent but buttons[4] is pressed: stop in either order
        let msg = joy(&[0.0, 0.0, 0.0, 1.0], &[0, 0, 0, 0, 1]);
        for brake_buttons in [vec![4, 5], vec![5, 4]] {
            let config = TeleopConfig {
                brake_buttons,
                ..TeleopConfig::default()
            };
            let twist = translate(&msg, &config).unwrap();
            assert_twist(&twist, -0.3, 0.0);
        }
    }

    #[test]
    fn test_missing_brake_button_rejected_when_none_pressed() {
        let config = TeleopConfig {
            brake_buttons: vec![5, 4],
            ..TeleopConfig::default()
        };
        let err = translate(&joy(&[0.0; 4], &[0, 0, 0, 0, 0]), &config).unwrap_err();
        assert_eq!(err, InputError::MissingButton { index: 5, len: 5 });
    }

    #[test]
    fn test_brake_with_short_axes_still_stops() {
        let twist = translate(&joy(&[], &[0, 0, 0, 0, 1]), &TeleopConfig::default()).unwrap();
        assert_twist(&twist, -0.3, 0.0);
    }

    #[test]
    fn test_non_finite_axis_rejected() {
        let err = translate(&joy(&[f32::NAN, 0.0, 0.0, 1.0], &[0; 6]), &TeleopConfig::default())
            .unwrap_err();
        assert!(matches!(err, InputError::NonFiniteAxis { index: 0, .. }));
    }

    #[test]
    fn test_teleop_caches_last_command() {
        let mut teleop = Teleop::new(TeleopConfig::default());
        assert!(teleop.last_command().is_none());

        let twist = teleop.on_joy(&joy(&[-1.0, 0.0, 0.0, -1.0], &[0; 6])).unwrap();
        assert_eq!(teleop.last_command(), Some(&twist));

        // Rejected message keeps the previous command
        assert!(teleop.on_joy(&joy(&[0.0], &[0; 6])).is_err());
        assert_eq!(teleop.last_command(), Some(&twist));
    }

    #[test]
    fn test_teleop_tracks_brake_state() {
        let mut teleop = Teleop::new(TeleopConfig::default());
        teleop.on_joy(&joy(&[0.0; 4], &[0, 0, 0, 0, 0, 1])).unwrap();
        assert!(teleop.is_braking());
        teleop.on_joy(&joy(&[0.0; 4], &[0; 6])).unwrap();
        assert!(!teleop.is_braking());
    }
}

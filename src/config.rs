// Node name, topics, teleop parameters
use std::path::PathBuf;

use clap::Parser;

// Process name (used as the log span and clap command name)
pub const NODE_NAME: &str = "jetson_teleop";

// Zenoh topics
pub const TOPIC_JOY: &str = "joy"; // joystick state in
pub const TOPIC_CMD_VEL: &str = "cmd_vel"; // velocity command out

// Incoming joystick samples buffered before the oldest is dropped
pub const JOY_QUEUE_DEPTH: usize = 10;

// Parameter defaults (Logitech F710, XInput mode)
pub const DEFAULT_AXIS_LINEAR: usize = 3; // right stick vertical
pub const DEFAULT_AXIS_ANGULAR: usize = 0; // left stick horizontal
pub const DEFAULT_SCALE_LINEAR: f64 = 0.3;
pub const DEFAULT_SCALE_ANGULAR: f64 = 0.9;
pub const DEFAULT_BRAKE_BUTTONS: [usize; 2] = [4, 5]; // LB, RB
pub const DEFAULT_BRAKE_TRIGGER: i32 = 1; // pressed

// Declared pad layout used to validate indices at startup
pub const DEFAULT_AXIS_COUNT: usize = 8;
pub const DEFAULT_BUTTON_COUNT: usize = 11;

/// Configuration errors, reported before the node touches the bus
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{role} axis index {index} out of range (pad has {count} axes)")]
    AxisOutOfRange {
        role: &'static str,
        index: usize,
        count: usize,
    },

    #[error("Brake button index {index} out of range (pad has {count} buttons)")]
    ButtonOutOfRange { index: usize, count: usize },

    #[error("No emergency brake button configured")]
    NoBrakeButtons,

    #[error("Scale {name} must be finite, got {value}")]
    NonFiniteScale { name: &'static str, value: f64 },
}

/// Number of axes and buttons the pad is expected to report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceLayout {
    pub axes: usize,
    pub buttons: usize,
}

impl Default for DeviceLayout {
    fn default() -> Self {
        Self {
            axes: DEFAULT_AXIS_COUNT,
            buttons: DEFAULT_BUTTON_COUNT,
        }
    }
}

/// Translation parameters, fixed for the lifetime of the node
#[derive(Debug, Clone, PartialEq)]
pub struct TeleopConfig {
    pub axis_linear: usize,
    pub axis_angular: usize,
    pub scale_linear: f64,
    pub scale_angular: f64,
    pub brake_buttons: Vec<usize>,
    pub brake_trigger: i32,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            axis_linear: DEFAULT_AXIS_LINEAR,
            axis_angular: DEFAULT_AXIS_ANGULAR,
            scale_linear: DEFAULT_SCALE_LINEAR,
            scale_angular: DEFAULT_SCALE_ANGULAR,
            brake_buttons: DEFAULT_BRAKE_BUTTONS.to_vec(),
            brake_trigger: DEFAULT_BRAKE_TRIGGER,
        }
    }
}

impl TeleopConfig {
    /// Check every index against the pad layout and reject non-finite scales
    pub fn validate(&self, layout: &DeviceLayout) -> Result<(), ConfigError> {
        for (role, index) in [("Linear", self.axis_linear), ("Angular", self.axis_angular)] {
            if index >= layout.axes {
                return Err(ConfigError::AxisOutOfRange {
                    role,
                    index,
                    count: layout.axes,
                });
            }
        }

        if self.brake_buttons.is_empty() {
            return Err(ConfigError::NoBrakeButtons);
        }
        if let Some(&index) = self.brake_buttons.iter().find(|&&b| b >= layout.buttons) {
            return Err(ConfigError::ButtonOutOfRange {
                index,
                count: layout.buttons,
            });
        }

        for (name, value) in [
            ("scale_linear", self.scale_linear),
            ("scale_angular", self.scale_angular),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteScale { name, value });
            }
        }

        Ok(())
    }
}

/// Startup parameters: command line, then environment, then defaults
#[derive(Debug, Clone, Parser)]
#[command(name = NODE_NAME, version, about = "Joystick to cmd_vel teleop node")]
pub struct NodeParams {
    /// Axis driving forward speed
    #[arg(long, env = "JETSON_TELEOP_AXIS_LINEAR", default_value_t = DEFAULT_AXIS_LINEAR)]
    pub axis_linear: usize,

    /// Axis driving turn rate
    #[arg(long, env = "JETSON_TELEOP_AXIS_ANGULAR", default_value_t = DEFAULT_AXIS_ANGULAR)]
    pub axis_angular: usize,

    #[arg(
        long,
        env = "JETSON_TELEOP_SCALE_LINEAR",
        default_value_t = DEFAULT_SCALE_LINEAR,
        allow_negative_numbers = true
    )]
    pub scale_linear: f64,

    #[arg(
        long,
        env = "JETSON_TELEOP_SCALE_ANGULAR",
        default_value_t = DEFAULT_SCALE_ANGULAR,
        allow_negative_numbers = true
    )]
    pub scale_angular: f64,

    /// Buttons that trigger the emergency brake (comma separated)
    #[arg(
        long,
        env = "JETSON_TELEOP_BRAKE_BUTTONS",
        value_delimiter = ',',
        default_values_t = DEFAULT_BRAKE_BUTTONS
    )]
    pub brake_buttons: Vec<usize>,

    /// Button value that counts as "brake requested"
    #[arg(
        long,
        env = "JETSON_TELEOP_BRAKE_TRIGGER",
        default_value_t = DEFAULT_BRAKE_TRIGGER,
        allow_negative_numbers = true
    )]
    pub brake_trigger: i32,

    /// Number of axes the pad reports
    #[arg(long, env = "JETSON_TELEOP_AXIS_COUNT", default_value_t = DEFAULT_AXIS_COUNT)]
    pub axis_count: usize,

    /// Number of buttons the pad reports
    #[arg(long, env = "JETSON_TELEOP_BUTTON_COUNT", default_value_t = DEFAULT_BUTTON_COUNT)]
    pub button_count: usize,

    #[arg(long, default_value = TOPIC_JOY)]
    pub joy_topic: String,

    #[arg(long, default_value = TOPIC_CMD_VEL)]
    pub cmd_vel_topic: String,

    /// Zenoh configuration file (default Zenoh config if omitted)
    #[arg(long)]
    pub zenoh_config: Option<PathBuf>,
}

impl NodeParams {
    pub fn teleop_config(&self) -> TeleopConfig {
        TeleopConfig {
            axis_linear: self.axis_linear,
            axis_angular: self.axis_angular,
            scale_linear: self.scale_linear,
            scale_angular: self.scale_angular,
            brake_buttons: self.brake_buttons.clone(),
            brake_trigger: self.brake_trigger,
        }
    }

    pub fn layout(&self) -> DeviceLayout {
        DeviceLayout {
            axes: self.axis_count,
            buttons: self.button_count,
        }
    }
}

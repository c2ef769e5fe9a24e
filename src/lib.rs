// Joystick teleop node for the Jetson car
//
// - config: node parameters and startup validation
// - messages: joystick state and velocity command wire types
// - teleop: joystick -> cmd_vel translation
// - runtime: Zenoh subscribe/translate/publish loop

pub mod config;
pub mod messages;
pub mod runtime;
pub mod teleop;

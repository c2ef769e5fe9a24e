// Keyboard joystick emulator: W/S linear stick, A/D angular stick, Space brake, Q quit
// Publishes F710-shaped joystick state (8 axes, 11 buttons) on the joy topic.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use jetson_teleop::config::{
    DEFAULT_AXIS_ANGULAR, DEFAULT_AXIS_COUNT, DEFAULT_AXIS_LINEAR, DEFAULT_BRAKE_BUTTONS,
    DEFAULT_BUTTON_COUNT, TOPIC_JOY,
};
use jetson_teleop::messages::JoystickState;
use std::time::{Duration, Instant};
use tracing::info;

const STICK_STEP: f32 = 0.25; // stick deflection per key press
const INPUT_TIMEOUT_MS: u64 = 150; // Sticks spring back after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_JOY).await?;

    info!("Controls: W/S=linear stick, A/D=angular stick, Space=brake, Q=quit");

    enable_raw_mode()?;
    let result = run_pad(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_pad(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut joy = JoystickState::new(
        vec![0.0; DEFAULT_AXIS_COUNT],
        vec![0; DEFAULT_BUTTON_COUNT],
    );
    let mut last_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('w') if pressed => {
                        nudge(&mut joy.axes[DEFAULT_AXIS_LINEAR], STICK_STEP);
                        last_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        nudge(&mut joy.axes[DEFAULT_AXIS_LINEAR], -STICK_STEP);
                        last_input = Instant::now();
                    }
                    // Stick left is positive, as on the pad
                    KeyCode::Char('a') if pressed => {
                        nudge(&mut joy.axes[DEFAULT_AXIS_ANGULAR], STICK_STEP);
                        last_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        nudge(&mut joy.axes[DEFAULT_AXIS_ANGULAR], -STICK_STEP);
                        last_input = Instant::now();
                    }
                    KeyCode::Char(' ') if pressed => {
                        joy.buttons[DEFAULT_BRAKE_BUTTONS[0]] = 1;
                        last_input = Instant::now();
                    }

                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Release sticks and brake if no input for INPUT_TIMEOUT_MS
        if last_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            joy.axes.iter_mut().for_each(|a| *a = 0.0);
            joy.buttons.iter_mut().for_each(|b| *b = 0);
        }

        publisher.put(serde_json::to_string(&joy)?).await?;
    }

    Ok(())
}

fn nudge(axis: &mut f32, step: f32) {
    *axis = (*axis + step).clamp(-1.0, 1.0);
}

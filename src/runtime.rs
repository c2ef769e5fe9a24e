// Event-driven teleop loop over Zenoh
// One joy sample is decoded, translated and published before the next is taken.
// cmd_vel is "latched": a queryable on the same key hands the last command to late joiners.

use tracing::{debug, info, warn};
use zenoh::handlers::RingChannel;

// local imports
use crate::config::{JOY_QUEUE_DEPTH, NodeParams};
use crate::messages::{JoystickState, Twist};
use crate::teleop::Teleop;

/// Decode and translate one joy payload
///
/// Returns the command to publish, or `None` when the payload is skipped
/// (undecodable JSON or a rejected joystick state).
pub fn handle_sample(teleop: &mut Teleop, payload: &[u8]) -> Option<Twist> {
    let joy = match serde_json::from_slice::<JoystickState>(payload) {
        Ok(joy) => joy,
        Err(e) => {
            warn!("Failed to parse joystick state: {}", e);
            return None;
        }
    };

    match teleop.on_joy(&joy) {
        Ok(twist) => Some(twist),
        Err(e) => {
            warn!("Skipping joystick state: {}", e);
            None
        }
    }
}

/// JSON for a late joiner's query; nothing is latched until the first command goes out
pub fn latched_reply(teleop: &Teleop) -> Result<Option<String>, serde_json::Error> {
    teleop.last_command().map(serde_json::to_string).transpose()
}

pub async fn run(params: NodeParams) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Reject bad indices before touching the bus
    let config = params.teleop_config();
    config.validate(&params.layout())?;
    info!(
        "Parameters: axis_linear={}, axis_angular={}, scale_linear={}, scale_angular={}, brake_buttons={:?}",
        config.axis_linear,
        config.axis_angular,
        config.scale_linear,
        config.scale_angular,
        config.brake_buttons
    );

    info!("Opening Zenoh session...");
    let zenoh_config = match &params.zenoh_config {
        Some(path) => zenoh::Config::from_file(path)?,
        None => zenoh::Config::default(),
    };
    let session = zenoh::open(zenoh_config).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = session
        .declare_subscriber(params.joy_topic.as_str())
        .with(RingChannel::new(JOY_QUEUE_DEPTH))
        .await?;
    let pub_cmd_vel = session
        .declare_publisher(params.cmd_vel_topic.as_str())
        .await?;
    let latch = session
        .declare_queryable(params.cmd_vel_topic.as_str())
        .await?;

    let mut teleop = Teleop::new(config);

    info!("Subscribed to: {}", params.joy_topic);
    info!("Publishing to: {} (latched)", params.cmd_vel_topic);
    println!("Jetson Joystick Node activated");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            sample = subscriber.recv_async() => {
                let sample = match sample {
                    Ok(sample) => sample,
                    Err(e) => {
                        warn!("Joy subscriber closed: {}", e);
                        break;
                    }
                };

                let payload = sample.payload().to_bytes();
                if let Some(twist) = handle_sample(&mut teleop, &payload) {
                    let twist_json = serde_json::to_string(&twist)?;
                    pub_cmd_vel.put(twist_json).await?;
                }
            }

            query = latch.recv_async() => {
                let Ok(query) = query else {
                    warn!("cmd_vel queryable closed");
                    break;
                };

                if let Some(twist_json) = latched_reply(&teleop)? {
                    debug!("Replaying latched cmd_vel to {}", query.selector());
                    // Answer on the concrete topic even for wildcard queries
                    if let Err(e) = query.reply(params.cmd_vel_topic.as_str(), twist_json).await {
                        warn!("Failed to answer cmd_vel query: {}", e);
                    }
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    session.close().await?;
    info!("Zenoh session closed");
    Ok(())
}

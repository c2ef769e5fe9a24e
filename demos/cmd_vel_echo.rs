// Late joiner: fetch the latched cmd_vel, then print every new command
use jetson_teleop::config::TOPIC_CMD_VEL;
use jetson_teleop::messages::Twist;
use tracing::{info, warn};

fn show(payload: &[u8]) {
    match serde_json::from_slice::<Twist>(payload) {
        Ok(twist) => info!(
            "cmd_vel: linear.x={:+.3} angular.z={:+.3}",
            twist.linear.x, twist.angular.z
        ),
        Err(e) => warn!("Failed to parse cmd_vel: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Querying latched {}...", TOPIC_CMD_VEL);
    let replies = session.get(TOPIC_CMD_VEL).await?;
    while let Ok(reply) = replies.recv_async().await {
        match reply.result() {
            Ok(sample) => show(&sample.payload().to_bytes()),
            Err(err) => warn!("Query error: {:?}", err),
        }
    }

    let subscriber = session.declare_subscriber(TOPIC_CMD_VEL).await?;
    info!("Subscribed to: {}", TOPIC_CMD_VEL);
    while let Ok(sample) = subscriber.recv_async().await {
        show(&sample.payload().to_bytes());
    }

    Ok(())
}

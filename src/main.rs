use clap::Parser;
use tracing::{Instrument, info_span};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use jetson_teleop::config::{NODE_NAME, NodeParams};

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let params = NodeParams::parse();

    let node = info_span!("node", name = NODE_NAME);
    if let Err(e) = jetson_teleop::runtime::run(params).instrument(node).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}

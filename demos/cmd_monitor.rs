// Command monitor: print velocity commands published by the keyboard teleop
//
// Usage: cargo run --example cmd_monitor -- [topic]
use tracing::{info, warn};
use zenoh_keyboard_teleop::config::TOPIC_CMD_VEL;
use zenoh_keyboard_teleop::messages::VelocityCommand;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let topic = std::env::args()
        .nth(1)
        .unwrap_or_else(|| TOPIC_CMD_VEL.to_string());

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let subscriber = session.declare_subscriber(topic.clone()).await?;
    info!("Subscribed to: {}", topic);

    let mut last: Option<VelocityCommand> = None;
    loop {
        tokio::select! {
            sample = subscriber.recv_async() => {
                let sample = sample?;
                let payload = sample.payload().to_bytes();
                match serde_json::from_slice::<VelocityCommand>(&payload) {
                    Ok(cmd) => {
                        // Only print changes, the teleop repeats itself at ~4Hz
                        if last != Some(cmd) {
                            info!("linear_x={:+.3} angular_z={:+.3}", cmd.linear_x, cmd.angular_z);
                            last = Some(cmd);
                        }
                    }
                    Err(e) => warn!("Failed to parse command: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.close().await?;
    Ok(())
}

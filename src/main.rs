use clap::Parser;
use tracing_subscriber::EnvFilter;

use zenoh_keyboard_teleop::cli::Cli;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug), stderr keeps stdout for the banner
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = zenoh_keyboard_teleop::runtime::run(config).await {
        eprintln!("Teleop error: {}", e);
        std::process::exit(1);
    }
}

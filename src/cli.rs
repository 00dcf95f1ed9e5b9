// Command-line arguments
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "keyboard-teleop", version, about = "Drive a robot base with WASD over zenoh")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Zenoh key to publish velocity commands on
    #[arg(long)]
    pub topic: Option<String>,

    /// Slow linear speed (m/s)
    #[arg(long)]
    pub walk_vel: Option<f64>,

    /// Fast linear speed (m/s)
    #[arg(long)]
    pub run_vel: Option<f64>,

    /// Slow yaw rate (rad/s)
    #[arg(long)]
    pub yaw_rate: Option<f64>,

    /// Fast yaw rate (rad/s)
    #[arg(long)]
    pub yaw_rate_run: Option<f64>,

    /// Log commands instead of publishing them
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Load the config file (or defaults) and apply the command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(topic) = &self.topic {
            config.transport.topic = topic.clone();
        }
        if let Some(v) = self.walk_vel {
            config.speed.walk_vel = v;
        }
        if let Some(v) = self.run_vel {
            config.speed.run_vel = v;
        }
        if let Some(v) = self.yaw_rate {
            config.speed.yaw_rate = v;
        }
        if let Some(v) = self.yaw_rate_run {
            config.speed.yaw_rate_run = v;
        }
        if self.dry_run {
            config.transport.dry_run = true;
        }
    }
}

// Speed tiers, control constants, zenoh topic
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, TeleopError};

// Acceleration limit shared by the linear and angular ramps (units/s^2)
pub const ACCEL_LIMIT: f64 = 0.2;

// Ramped outputs below this magnitude are sent as exactly zero
pub const DEAD_BAND: f64 = 0.1;

// Keyboard poll timeout, also paces the control loop (~4Hz when idle)
pub const POLL_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_VEL: &str = "teleop/cmd_vel"; // velocity commands

/// Full teleop configuration, usually read from a TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub speed: SpeedConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub transport: TransportConfig,
}

/// Speed tier magnitudes (m/s for linear, rad/s for angular)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeedConfig {
    #[serde(default = "default_walk_vel")]
    pub walk_vel: f64,

    #[serde(default = "default_run_vel")]
    pub run_vel: f64,

    #[serde(default = "default_yaw_rate")]
    pub yaw_rate: f64,

    #[serde(default = "default_yaw_rate_run")]
    pub yaw_rate_run: f64,
}

/// Control loop tuning
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ControlConfig {
    #[serde(default = "default_accel_limit")]
    pub accel_limit: f64,

    #[serde(default = "default_dead_band")]
    pub dead_band: f64,

    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,

    /// Re-derive the speed tiers from the commanded velocity after a key burst
    #[serde(default)]
    pub recalibrate_on_idle: bool,
}

/// Command transport
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TransportConfig {
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Log commands instead of publishing them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_walk_vel() -> f64 { 0.5 }
fn default_run_vel() -> f64 { 1.0 }
fn default_yaw_rate() -> f64 { 1.0 }
fn default_yaw_rate_run() -> f64 { 1.5 }

fn default_accel_limit() -> f64 { ACCEL_LIMIT }
fn default_dead_band() -> f64 { DEAD_BAND }
fn default_poll_timeout_ms() -> u64 { POLL_TIMEOUT.as_millis() as u64 }

fn default_topic() -> String { TOPIC_CMD_VEL.to_string() }

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            walk_vel: default_walk_vel(),
            run_vel: default_run_vel(),
            yaw_rate: default_yaw_rate(),
            yaw_rate_run: default_yaw_rate_run(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            accel_limit: default_accel_limit(),
            dead_band: default_dead_band(),
            poll_timeout_ms: default_poll_timeout_ms(),
            recalibrate_on_idle: false,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            dry_run: false,
        }
    }
}

impl ControlConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

impl Config {
    /// Load and validate a configuration file
    ///
    /// Missing sections and keys fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the control loop
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("walk_vel", self.speed.walk_vel),
            ("run_vel", self.speed.run_vel),
            ("yaw_rate", self.speed.yaw_rate),
            ("yaw_rate_run", self.speed.yaw_rate_run),
            ("accel_limit", self.control.accel_limit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TeleopError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.control.dead_band.is_finite() || self.control.dead_band < 0.0 {
            return Err(TeleopError::InvalidConfig(
                "dead_band must be zero or positive".to_string(),
            ));
        }

        if self.control.poll_timeout_ms == 0 || self.control.poll_timeout_ms > 10_000 {
            return Err(TeleopError::InvalidConfig(
                "poll_timeout_ms must be between 1 and 10000".to_string(),
            ));
        }

        if self.transport.topic.trim().is_empty() {
            return Err(TeleopError::InvalidConfig(
                "transport topic cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

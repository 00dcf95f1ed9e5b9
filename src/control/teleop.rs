// Keyboard teleop control loop
//
// Each iteration: measure dt, poll one key (bounded by the poll timeout),
// update the intent, ramp toward the target, dead-band, emit. The poll
// timeout paces the loop, so commands keep flowing (and ramping) while no
// key is pressed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

use super::keymap::map_key;
use super::state::ControlState;
use crate::config::{Config, ControlConfig, SpeedConfig};
use crate::error::Result;
use crate::input::{InputEvent, InputSource};
use crate::messages::VelocityCommand;
use crate::sink::CommandSink;
use crate::timer::Timer;

/// Coarse loop phase, used for logging transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Ramping,
}

pub struct ControlLoop<I, S> {
    input: I,
    sink: S,
    speeds: SpeedConfig,
    control: ControlConfig,
    state: ControlState,
    phase: MotionPhase,
    timer: Timer,
    stop: Arc<AtomicBool>,
}

impl<I: InputSource, S: CommandSink> ControlLoop<I, S> {
    pub fn new(input: I, sink: S, config: &Config, stop: Arc<AtomicBool>) -> Self {
        Self {
            input,
            sink,
            speeds: config.speed.clone(),
            control: config.control.clone(),
            state: ControlState::new(&config.speed),
            phase: MotionPhase::Idle,
            timer: Timer::new(),
            stop,
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Run one control update
    ///
    /// `key` is the keystroke received this iteration, `None` on timeout.
    /// Returns the command to emit.
    pub fn step(&mut self, dt: f64, key: Option<u8>) -> VelocityCommand {
        match key {
            Some(key) => {
                let action = map_key(key);
                debug!("Key 0x{:02x} -> {:?}", key, action);
                self.state.apply(action, &self.speeds);
            }
            None => {
                if self.control.recalibrate_on_idle && self.state.recalibrate() {
                    debug!(
                        "Recalibrated tiers: linear={:.3} angular={:.3}",
                        self.state.tier_linear, self.state.tier_angular
                    );
                }
            }
        }

        let cmd = self
            .state
            .advance(dt, self.control.accel_limit, self.control.dead_band);

        let phase = if self.state.is_idle() {
            MotionPhase::Idle
        } else {
            MotionPhase::Ramping
        };
        if phase != self.phase {
            let (target_linear, target_angular) = self.state.targets();
            info!(
                "{:?} -> {:?} (target linear={:.2} angular={:.2})",
                self.phase, phase, target_linear, target_angular
            );
            self.phase = phase;
        }

        cmd
    }

    /// Poll, update and emit until stopped or the keyboard fails
    ///
    /// The stop flag is checked once per iteration, so a stop request is
    /// honoured within one poll timeout. Ctrl+C raises the flag itself.
    /// Poll/read errors end the loop and are returned; there is no retry.
    pub fn run(&mut self) -> Result<()> {
        let timeout = self.control.poll_timeout();
        info!(
            "Control loop started: {}ms poll, accel limit {}, dead-band {}",
            timeout.as_millis(),
            self.control.accel_limit,
            self.control.dead_band
        );

        self.timer.begin();
        loop {
            if self.stop.load(Ordering::SeqCst) {
                info!("Stop requested, leaving control loop");
                return Ok(());
            }

            let dt = self.timer.lap();

            let key = match self.input.poll(timeout) {
                Ok(InputEvent::Key(key)) => Some(key),
                Ok(InputEvent::Timeout) => None,
                Ok(InputEvent::Interrupt) => {
                    info!("Ctrl+C pressed, stopping");
                    self.stop.store(true, Ordering::SeqCst);
                    return Ok(());
                }
                Err(e) => {
                    error!("Keyboard poll failed: {}", e);
                    return Err(e.into());
                }
            };

            let cmd = self.step(dt, key);
            debug!("sx:{:.3} sw:{:.3}", cmd.linear_x, cmd.angular_z);
            self.sink.send(cmd);
        }
    }

    /// Emit a zero command
    pub fn stop_robot(&mut self) {
        info!("Sending stop command");
        self.sink.send(VelocityCommand::zero());
    }
}

// Control state owned by the teleop loop

use super::keymap::{Direction, KeyAction, SpeedTier};
use super::ramp::{dead_band, ramp};
use crate::config::SpeedConfig;
use crate::messages::VelocityCommand;

// Directions smaller than this are treated as zero when recalibrating
const MIN_DIRECTION: f64 = 0.00001;

#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Ramped velocities, before the dead-band
    pub commanded_linear: f64,
    pub commanded_angular: f64,

    /// Last dead-banded command, as sent
    pub emitted: VelocityCommand,

    /// Selected speed tier magnitudes
    pub tier_linear: f64,
    pub tier_angular: f64,

    pub direction_linear: Direction,
    pub direction_rotate: Direction,

    /// A motion key was pressed since the last recalibration
    pub dirty: bool,
}

impl ControlState {
    /// Stationary state with the slow tiers selected
    pub fn new(speeds: &SpeedConfig) -> Self {
        Self {
            commanded_linear: 0.0,
            commanded_angular: 0.0,
            emitted: VelocityCommand::zero(),
            tier_linear: speeds.walk_vel,
            tier_angular: speeds.yaw_rate,
            direction_linear: Direction::Neutral,
            direction_rotate: Direction::Neutral,
            dirty: false,
        }
    }

    /// Update directions and tiers from a decoded keystroke
    pub fn apply(&mut self, action: KeyAction, speeds: &SpeedConfig) {
        match action {
            KeyAction::Drive { direction, tier } => {
                self.tier_linear = match tier {
                    SpeedTier::Normal => speeds.walk_vel,
                    SpeedTier::Fast => speeds.run_vel,
                };
                self.direction_linear = direction;
                self.dirty = true;
            }
            KeyAction::Turn { direction, tier } => {
                self.tier_angular = match tier {
                    SpeedTier::Normal => speeds.yaw_rate,
                    SpeedTier::Fast => speeds.yaw_rate_run,
                };
                self.direction_rotate = direction;
                self.dirty = true;
            }
            KeyAction::StopTurn => {
                self.tier_angular = speeds.yaw_rate;
                self.direction_rotate = Direction::Neutral;
            }
            KeyAction::ReleaseAll => {
                self.tier_linear = speeds.walk_vel;
                self.tier_angular = speeds.yaw_rate;
                self.direction_linear = Direction::Neutral;
                self.direction_rotate = Direction::Neutral;
                self.dirty = false;
            }
        }
    }

    /// Back-compute the tiers from the last emitted command after a key burst
    ///
    /// Uses the dead-banded value, so a burst that never left the dead-band
    /// recalibrates to zero. Axes with no direction keep their tier. Returns
    /// false (and changes nothing) if the state is not dirty.
    pub fn recalibrate(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        if let Some(tier) = back_compute_tier(self.emitted.linear_x, self.direction_linear) {
            self.tier_linear = tier;
        }
        if let Some(tier) = back_compute_tier(self.emitted.angular_z, self.direction_rotate) {
            self.tier_angular = tier;
        }
        self.dirty = false;
        true
    }

    /// Target velocities: direction times tier on each axis
    pub fn targets(&self) -> (f64, f64) {
        (
            self.direction_linear.sign() * self.tier_linear,
            self.direction_rotate.sign() * self.tier_angular,
        )
    }

    /// Ramp both axes toward their targets and return the dead-banded command
    pub fn advance(&mut self, dt: f64, accel_limit: f64, threshold: f64) -> VelocityCommand {
        let (target_linear, target_angular) = self.targets();

        self.commanded_linear = ramp(dt, self.commanded_linear, accel_limit, target_linear);
        self.commanded_angular = ramp(dt, self.commanded_angular, accel_limit, target_angular);

        self.emitted = VelocityCommand::new(
            dead_band(self.commanded_linear, threshold),
            dead_band(self.commanded_angular, threshold),
        );
        self.emitted
    }

    /// Nothing requested and nothing left to ramp down
    pub fn is_idle(&self) -> bool {
        self.direction_linear == Direction::Neutral
            && self.direction_rotate == Direction::Neutral
            && self.commanded_linear == 0.0
            && self.commanded_angular == 0.0
    }
}

fn back_compute_tier(emitted: f64, direction: Direction) -> Option<f64> {
    let sign = direction.sign();
    if sign.abs() > MIN_DIRECTION {
        Some(emitted / sign)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::keymap::map_key;

    fn speeds() -> SpeedConfig {
        SpeedConfig::default()
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = ControlState::new(&speeds());
        assert!(state.is_idle());
        assert_eq!(state.tier_linear, 0.5);
        assert_eq!(state.tier_angular, 1.0);
        assert_eq!(state.targets(), (0.0, 0.0));
    }

    #[test]
    fn test_forward_walk() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'w'), &speeds());

        assert_eq!(state.direction_linear, Direction::Positive);
        assert_eq!(state.tier_linear, 0.5);
        assert!(state.dirty);
        assert_eq!(state.targets(), (0.5, 0.0));
    }

    #[test]
    fn test_fast_tiers() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'S'), &speeds());
        state.apply(map_key(b'A'), &speeds());
        assert_eq!(state.targets(), (-1.0, 1.5));
    }

    #[test]
    fn test_drive_keeps_rotation() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'd'), &speeds());
        state.apply(map_key(b'w'), &speeds());
        assert_eq!(state.targets(), (0.5, -1.0));
    }

    #[test]
    fn test_stop_turn_keeps_linear() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'W'), &speeds());
        state.apply(map_key(b'A'), &speeds());
        state.dirty = false;
        state.apply(map_key(b'e'), &speeds());

        assert_eq!(state.direction_rotate, Direction::Neutral);
        assert_eq!(state.tier_angular, 1.0);
        assert_eq!(state.targets(), (1.0, 0.0));
        assert!(!state.dirty);
    }

    #[test]
    fn test_release_all_resets_tiers() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'W'), &speeds());
        state.apply(map_key(b'D'), &speeds());
        state.apply(map_key(b' '), &speeds());

        assert_eq!(state.targets(), (0.0, 0.0));
        assert_eq!(state.tier_linear, 0.5);
        assert_eq!(state.tier_angular, 1.0);
        assert!(!state.dirty);
    }

    #[test]
    fn test_advance_ramps_and_dead_bands() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'w'), &speeds());

        // 0.2 * 0.25 = 0.05, inside the dead-band
        let cmd = state.advance(0.25, 0.2, 0.1);
        assert!((state.commanded_linear - 0.05).abs() < 1e-12);
        assert!(cmd.is_zero());

        let cmd = state.advance(0.5, 0.2, 0.1);
        assert!((cmd.linear_x - 0.15).abs() < 1e-12);
        assert_eq!(cmd.angular_z, 0.0);
    }

    #[test]
    fn test_recalibrate_uses_emitted_over_direction() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b's'), &speeds());
        state.apply(map_key(b'a'), &speeds());
        state.emitted = VelocityCommand::new(-0.3, 0.4);

        assert!(state.recalibrate());
        assert!((state.tier_linear - 0.3).abs() < 1e-12);
        assert!((state.tier_angular - 0.4).abs() < 1e-12);
        assert!(!state.dirty);
    }

    #[test]
    fn test_recalibrate_skips_neutral_axis() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'W'), &speeds());
        state.emitted = VelocityCommand::new(0.6, 0.25);

        assert!(state.recalibrate());
        assert!((state.tier_linear - 0.6).abs() < 1e-12);
        // No rotation direction, tier untouched
        assert_eq!(state.tier_angular, 1.0);
    }

    #[test]
    fn test_recalibrate_requires_dirty() {
        let mut state = ControlState::new(&speeds());
        state.direction_linear = Direction::Positive;
        state.emitted = VelocityCommand::new(0.2, 0.0);

        assert!(!state.recalibrate());
        assert_eq!(state.tier_linear, 0.5);
    }

    #[test]
    fn test_recalibrate_inside_dead_band_gives_zero_tier() {
        let mut state = ControlState::new(&speeds());
        state.apply(map_key(b'w'), &speeds());

        // 0.2 * 0.25 = 0.05 ramped, sent as 0
        let cmd = state.advance(0.25, 0.2, 0.1);
        assert!(cmd.is_zero());
        assert!((state.commanded_linear - 0.05).abs() < 1e-12);

        assert!(state.recalibrate());
        assert_eq!(state.tier_linear, 0.0);
        assert_eq!(state.targets(), (0.0, 0.0));
    }
}

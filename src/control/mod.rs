// Keyboard motion control for a differential-drive base
//
// Provides:
// - WASD key mapping to drive/turn intents with speed tiers
// - Acceleration-limited ramp and output dead-band
// - The control loop state machine driving a command sink

mod keymap;
mod ramp;
mod state;
mod teleop;

pub use keymap::{map_key, Direction, KeyAction, SpeedTier};
pub use ramp::{dead_band, ramp};
pub use state::ControlState;
pub use teleop::{ControlLoop, MotionPhase};

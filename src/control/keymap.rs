// WASD key mapping
//
// One byte per control iteration, no key combinations. Lowercase keys select
// the slow tier, Shift (uppercase) selects the fast tier.

/// Sign of the desired motion on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Negative => -1.0,
            Direction::Neutral => 0.0,
            Direction::Positive => 1.0,
        }
    }
}

/// Speed tier selected by the key case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    Normal,
    Fast,
}

impl SpeedTier {
    fn of(key: u8) -> Self {
        if key.is_ascii_uppercase() {
            SpeedTier::Fast
        } else {
            SpeedTier::Normal
        }
    }
}

/// Control intent decoded from one keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// W/S: set linear direction and tier, rotation untouched
    Drive { direction: Direction, tier: SpeedTier },
    /// A/D: set rotation direction and tier, linear untouched
    Turn { direction: Direction, tier: SpeedTier },
    /// E: stop rotating, yaw tier back to normal
    StopTurn,
    /// Any other key: stop both axes, both tiers back to normal
    ReleaseAll,
}

impl KeyAction {
    /// Whether this action requests motion (marks the control state dirty)
    pub fn is_motion(self) -> bool {
        matches!(self, KeyAction::Drive { .. } | KeyAction::Turn { .. })
    }
}

pub const KEY_FORWARD: u8 = b'w';
pub const KEY_BACKWARD: u8 = b's';
pub const KEY_LEFT: u8 = b'a';
pub const KEY_RIGHT: u8 = b'd';
pub const KEY_STOP_TURN: u8 = b'e';

/// Map a raw key byte to its control intent
pub fn map_key(key: u8) -> KeyAction {
    let tier = SpeedTier::of(key);
    match key.to_ascii_lowercase() {
        KEY_FORWARD => KeyAction::Drive {
            direction: Direction::Positive,
            tier,
        },
        KEY_BACKWARD => KeyAction::Drive {
            direction: Direction::Negative,
            tier,
        },
        KEY_LEFT => KeyAction::Turn {
            direction: Direction::Positive,
            tier,
        },
        KEY_RIGHT => KeyAction::Turn {
            direction: Direction::Negative,
            tier,
        },
        KEY_STOP_TURN => KeyAction::StopTurn,
        _ => KeyAction::ReleaseAll,
    }
}

// Message types published by the teleop

use serde::{Deserialize, Serialize};

// Velocity command teleop -> robot base
// Default is the zero (stop) command
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct VelocityCommand {
    pub linear_x: f64,  // m/s, positive = forward
    pub angular_z: f64, // rad/s, positive = counter-clockwise
}

impl VelocityCommand {
    pub fn new(linear_x: f64, angular_z: f64) -> Self {
        Self {
            linear_x,
            angular_z,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.linear_x == 0.0 && self.angular_z == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_command() {
        assert!(VelocityCommand::zero().is_zero());
        assert!(!VelocityCommand::new(0.0, 0.3).is_zero());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(VelocityCommand::new(0.5, -1.0)).unwrap();
        assert_eq!(json["linear_x"], 0.5);
        assert_eq!(json["angular_z"], -1.0);

        let parsed: VelocityCommand =
            serde_json::from_str(r#"{"linear_x":0.2,"angular_z":0.0}"#).unwrap();
        assert_eq!(parsed, VelocityCommand::new(0.2, 0.0));
    }
}

//! Outbound command encoding
//!
//! Every command is a single ASCII line of the form `VERB[,ARG]*\n`.
//! Floats are always formatted with two decimal places so the firmware's
//! fixed-width parser never sees scientific notation or stray precision.

use std::fmt;

/// A user intent bound for the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Bulk configuration push: `SET,velocity,maxTemp,minMotorTemp`
    Configure {
        /// Extrusion velocity (mm/s)
        velocity: f32,
        /// Upper heater bound (°C)
        max_temp: f32,
        /// Motor engage threshold (°C)
        motor_engage_temp: f32,
    },
    /// Master system toggle: `SET_STATE,ON|OFF`
    SetSystem(bool),
    /// Heater toggle: `SET_HEATER,ON|OFF`
    SetHeater(bool),
    /// Motor toggle: `SET_MOTOR,ON|OFF`
    SetMotor(bool),
    /// Velocity setpoint: `SET_VEL,<float>`
    SetVelocity(f32),
    /// Target temperature setpoint: `SET_TEMP,<float>`
    SetTargetTemp(f32),
    /// Motor engage temperature setpoint: `SET_MOTOR_TEMP,<float>`
    SetMotorEngageTemp(f32),
}

fn on_off(state: bool) -> &'static str {
    if state {
        "ON"
    } else {
        "OFF"
    }
}

impl Command {
    /// The verb token this command is sent under.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Configure { .. } => "SET",
            Command::SetSystem(_) => "SET_STATE",
            Command::SetHeater(_) => "SET_HEATER",
            Command::SetMotor(_) => "SET_MOTOR",
            Command::SetVelocity(_) => "SET_VEL",
            Command::SetTargetTemp(_) => "SET_TEMP",
            Command::SetMotorEngageTemp(_) => "SET_MOTOR_TEMP",
        }
    }

    /// Encode as the wire line, including the trailing newline.
    pub fn encode(&self) -> String {
        match *self {
            Command::Configure {
                velocity,
                max_temp,
                motor_engage_temp,
            } => format!("SET,{velocity:.2},{max_temp:.2},{motor_engage_temp:.2}\n"),
            Command::SetSystem(s) => format!("SET_STATE,{}\n", on_off(s)),
            Command::SetHeater(s) => format!("SET_HEATER,{}\n", on_off(s)),
            Command::SetMotor(s) => format!("SET_MOTOR,{}\n", on_off(s)),
            Command::SetVelocity(v) => format!("SET_VEL,{v:.2}\n"),
            Command::SetTargetTemp(t) => format!("SET_TEMP,{t:.2}\n"),
            Command::SetMotorEngageTemp(t) => format!("SET_MOTOR_TEMP,{t:.2}\n"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode().trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_encode_on_off() {
        assert_eq!(Command::SetSystem(true).encode(), "SET_STATE,ON\n");
        assert_eq!(Command::SetSystem(false).encode(), "SET_STATE,OFF\n");
        assert_eq!(Command::SetHeater(true).encode(), "SET_HEATER,ON\n");
        assert_eq!(Command::SetMotor(false).encode(), "SET_MOTOR,OFF\n");
    }

    #[test]
    fn test_setpoints_have_two_decimals() {
        assert_eq!(Command::SetVelocity(40.0).encode(), "SET_VEL,40.00\n");
        assert_eq!(Command::SetTargetTemp(120.5).encode(), "SET_TEMP,120.50\n");
        assert_eq!(
            Command::SetMotorEngageTemp(90.125).encode(),
            "SET_MOTOR_TEMP,90.13\n"
        );
    }

    #[test]
    fn test_bulk_configure_argument_order() {
        let cmd = Command::Configure {
            velocity: 40.0,
            max_temp: 260.0,
            motor_engage_temp: 180.0,
        };
        assert_eq!(cmd.encode(), "SET,40.00,260.00,180.00\n");
    }

    #[test]
    fn test_encoded_lines_are_ascii() {
        let cmd = Command::SetTargetTemp(245.0);
        assert!(cmd.encode().is_ascii());
        assert!(cmd.encode().ends_with('\n'));
    }

    #[test]
    fn test_display_strips_newline() {
        assert_eq!(Command::SetVelocity(1.0).to_string(), "SET_VEL,1.00");
    }
}

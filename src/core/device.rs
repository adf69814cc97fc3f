//! Device state snapshot and bounded control parameters
//!
//! `DeviceState` mirrors the last telemetry frame received from the
//! extruder; it keeps no history. `ControlParameters` holds the client-side
//! setpoints the user is editing, each one clamped to a fixed range.

/// Temperature value reported while no reading is available.
///
/// Distinguishes "we have never heard from the device" from a real 0.0 °C
/// reading. The firmware uses the same convention in its own frames.
pub const UNKNOWN_TEMPERATURE: f32 = -1.0;

/// Last reported state of the extruder, rebuilt from each telemetry frame.
///
/// A valid frame fully overwrites the previous snapshot (last-write-wins);
/// a malformed frame leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceState {
    /// Hotend temperature in °C, or [`UNKNOWN_TEMPERATURE`].
    pub temperature_c: f32,
    /// Heater relay engaged
    pub heater_on: bool,
    /// Extruder motor running
    pub motor_on: bool,
    /// Master system switch
    pub system_on: bool,
    /// Velocity setpoint the device is holding (mm/s)
    pub target_velocity: f32,
    /// Temperature setpoint the device is holding (°C)
    pub target_temp: f32,
    /// Temperature above which the device engages the motor (°C)
    pub motor_engage_temp: f32,
}

impl DeviceState {
    /// The "never heard from the device" sentinel snapshot.
    pub fn unknown() -> Self {
        Self {
            temperature_c: UNKNOWN_TEMPERATURE,
            heater_on: false,
            motor_on: false,
            system_on: false,
            target_velocity: 0.0,
            target_temp: 0.0,
            motor_engage_temp: 0.0,
        }
    }

    /// Whether the temperature field holds a real reading.
    pub fn has_reading(&self) -> bool {
        self.temperature_c >= 0.0
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Identifies one of the tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Extrusion velocity (mm/s)
    Velocity,
    /// Heater target temperature (°C)
    TargetTemp,
    /// Motor engage threshold temperature (°C)
    MotorEngageTemp,
    /// Lower heater bound pushed with the bulk configuration (°C)
    MinHeaterTemp,
    /// Upper heater bound pushed with the bulk configuration (°C)
    MaxHeaterTemp,
}

impl ParamKind {
    /// All parameter kinds, in display order.
    pub fn all() -> &'static [ParamKind] {
        &[
            ParamKind::Velocity,
            ParamKind::TargetTemp,
            ParamKind::MotorEngageTemp,
            ParamKind::MinHeaterTemp,
            ParamKind::MaxHeaterTemp,
        ]
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::Velocity => "Velocity",
            ParamKind::TargetTemp => "Target temp",
            ParamKind::MotorEngageTemp => "Motor engage",
            ParamKind::MinHeaterTemp => "Min heater temp",
            ParamKind::MaxHeaterTemp => "Max heater temp",
        }
    }

    /// Unit suffix for display.
    pub fn unit(&self) -> &'static str {
        match self {
            ParamKind::Velocity => "mm/s",
            _ => "°C",
        }
    }
}

/// Direction of a held increment/decrement control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increment by one step
    Up,
    /// Decrement by one step
    Down,
}

/// A named tunable with a step size and a fixed clamping range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParameter {
    /// Current value
    pub value: f32,
    /// Delta applied per increment/decrement
    pub step: f32,
    /// Lower clamp bound
    pub min: f32,
    /// Upper clamp bound
    pub max: f32,
}

impl ControlParameter {
    /// Create a parameter, clamping the initial value into range.
    pub fn new(value: f32, step: f32, min: f32, max: f32) -> Self {
        let mut p = Self {
            value,
            step,
            min,
            max,
        };
        p.set(value);
        p
    }

    /// Set the value, clamped to `[min, max]`.
    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Apply one step in the given direction; returns the new value.
    pub fn nudge(&mut self, direction: Direction) -> f32 {
        let delta = match direction {
            Direction::Up => self.step,
            Direction::Down => -self.step,
        };
        self.set(self.value + delta);
        self.value
    }
}

/// The full client-side setpoint table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParameters {
    /// Extrusion velocity (mm/s)
    pub velocity: ControlParameter,
    /// Heater target temperature (°C)
    pub target_temp: ControlParameter,
    /// Motor engage threshold (°C)
    pub motor_engage_temp: ControlParameter,
    /// Lower heater bound (°C)
    pub min_heater_temp: ControlParameter,
    /// Upper heater bound (°C)
    pub max_heater_temp: ControlParameter,
}

impl Default for ControlParameters {
    fn default() -> Self {
        Self {
            velocity: ControlParameter::new(40.0, 0.5, 0.0, 100.0),
            target_temp: ControlParameter::new(120.0, 1.0, 0.0, 300.0),
            motor_engage_temp: ControlParameter::new(180.0, 1.0, 0.0, 250.0),
            min_heater_temp: ControlParameter::new(245.0, 1.0, 0.0, 250.0),
            max_heater_temp: ControlParameter::new(260.0, 1.0, 0.0, 300.0),
        }
    }
}

impl ControlParameters {
    /// Borrow the parameter for a kind.
    pub fn get(&self, kind: ParamKind) -> &ControlParameter {
        match kind {
            ParamKind::Velocity => &self.velocity,
            ParamKind::TargetTemp => &self.target_temp,
            ParamKind::MotorEngageTemp => &self.motor_engage_temp,
            ParamKind::MinHeaterTemp => &self.min_heater_temp,
            ParamKind::MaxHeaterTemp => &self.max_heater_temp,
        }
    }

    /// Mutably borrow the parameter for a kind.
    pub fn get_mut(&mut self, kind: ParamKind) -> &mut ControlParameter {
        match kind {
            ParamKind::Velocity => &mut self.velocity,
            ParamKind::TargetTemp => &mut self.target_temp,
            ParamKind::MotorEngageTemp => &mut self.motor_engage_temp,
            ParamKind::MinHeaterTemp => &mut self.min_heater_temp,
            ParamKind::MaxHeaterTemp => &mut self.max_heater_temp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let state = DeviceState::unknown();
        assert_eq!(state.temperature_c, UNKNOWN_TEMPERATURE);
        assert!(!state.has_reading());
        assert!(!state.system_on);

        let mut live = state;
        live.temperature_c = 0.0;
        assert!(live.has_reading());
    }

    #[test]
    fn test_nudge_clamps_at_bounds() {
        let mut p = ControlParameter::new(99.0, 0.5, 0.0, 100.0);

        for _ in 0..10 {
            p.nudge(Direction::Up);
        }
        assert_eq!(p.value, 100.0);

        for _ in 0..500 {
            p.nudge(Direction::Down);
        }
        assert_eq!(p.value, 0.0);
    }

    #[test]
    fn test_initial_value_clamped() {
        let p = ControlParameter::new(500.0, 1.0, 0.0, 300.0);
        assert_eq!(p.value, 300.0);
    }

    #[test]
    fn test_defaults_within_range() {
        let params = ControlParameters::default();
        for kind in ParamKind::all() {
            let p = params.get(*kind);
            assert!(p.value >= p.min && p.value <= p.max, "{kind:?}");
            assert!(p.step > 0.0);
        }
        assert_eq!(params.velocity.value, 40.0);
        assert_eq!(params.max_heater_temp.value, 260.0);
    }
}

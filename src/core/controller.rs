//! Device controller: the single owner of session, snapshot, and setpoints
//!
//! Everything a front-end does goes through this object; there is no
//! ambient module state. The controller owns at most one [`Session`], the
//! last [`DeviceState`] snapshot, and the client-side [`ControlParameters`];
//! a worker loop calls [`DeviceController::tick`] on a fixed interval and
//! forwards user intents to the other methods.

use std::time::Duration;

use crate::core::device::{ControlParameters, DeviceState, Direction, ParamKind};
use crate::core::discovery;
use crate::core::protocol::telemetry::TelemetryFrame;
use crate::core::protocol::Command;
use crate::core::session::{ConnectError, LinkState, Session};
use crate::core::transport::{SerialConfig, Transport};

/// Interval of the drain/repeat tick shared by all continuous activity.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Client-side controller for one extruder.
pub struct DeviceController {
    serial: SerialConfig,
    session: Option<Session>,
    device: DeviceState,
    params: ControlParameters,
    status: String,
}

impl Default for DeviceController {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceController {
    /// Controller with the stock serial settings (9600 8N1).
    pub fn new() -> Self {
        Self::with_serial_config(SerialConfig::default())
    }

    /// Controller with custom serial settings.
    pub fn with_serial_config(serial: SerialConfig) -> Self {
        Self {
            serial,
            session: None,
            device: DeviceState::unknown(),
            params: ControlParameters::default(),
            status: "Disconnected".to_string(),
        }
    }

    /// Enumerate selectable endpoints (see [`discovery::list_endpoints`]).
    pub fn list_endpoints() -> Vec<String> {
        discovery::list_endpoints()
    }

    /// Open a session on `endpoint`, closing any existing one first.
    pub async fn connect(&mut self, endpoint: &str) -> Result<(), ConnectError> {
        self.disconnect().await;

        match Session::open(endpoint, self.serial.clone()).await {
            Ok(session) => {
                self.status = format!("Connected to {endpoint}");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// Open a session over a pre-built transport (tests, loopback demo).
    pub async fn connect_with(
        &mut self,
        transport: Box<dyn Transport>,
        endpoint: &str,
    ) -> Result<(), ConnectError> {
        self.disconnect().await;

        match Session::open_with(transport, endpoint).await {
            Ok(session) => {
                self.status = format!("Connected to {endpoint}");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// Close the session and reset the snapshot to the unknown sentinel.
    pub async fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close().await;
            self.status = "Disconnected".to_string();
        }
        self.device = DeviceState::unknown();
    }

    /// Current link state.
    pub fn link_state(&self) -> LinkState {
        match &self.session {
            Some(s) => s.state(),
            None => LinkState::Disconnected,
        }
    }

    /// Whether a session is open.
    pub fn is_connected(&self) -> bool {
        self.link_state().is_connected()
    }

    /// Endpoint of the current (or last) session.
    pub fn endpoint(&self) -> Option<&str> {
        self.session.as_ref().map(Session::endpoint)
    }

    /// Last device snapshot.
    pub fn device_state(&self) -> DeviceState {
        self.device
    }

    /// Client-side setpoints.
    pub fn parameters(&self) -> &ControlParameters {
        &self.params
    }

    /// Connection status line for the UI.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Drain inbound telemetry and fold it into the snapshot.
    ///
    /// Called on every poll tick. A transport failure here takes the usual
    /// forced-disconnect path: sentinel snapshot, status update, no retry.
    pub async fn tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.drain().await {
            Ok(frames) => {
                for frame in frames {
                    match frame {
                        TelemetryFrame::Full(state) => self.device = state,
                        TelemetryFrame::Temperature(t) => self.device.temperature_c = t,
                    }
                }
            }
            Err(e) => self.on_link_loss(&e.to_string()),
        }
    }

    /// Master system toggle based on the last reported state.
    pub async fn toggle_system(&mut self) {
        let turn_on = !self.device.system_on;
        self.set_system(turn_on).await;
    }

    /// Switch the whole system on or off.
    ///
    /// Switching on first pushes the current target-temperature and
    /// motor-engage setpoints so the firmware starts from what the user
    /// sees on screen.
    pub async fn set_system(&mut self, on: bool) {
        if on {
            self.send(Command::SetTargetTemp(self.params.target_temp.value))
                .await;
            self.send(Command::SetMotorEngageTemp(
                self.params.motor_engage_temp.value,
            ))
            .await;
        }
        self.send(Command::SetSystem(on)).await;
    }

    /// Heater toggle based on the last reported state.
    pub async fn toggle_heater(&mut self) {
        let turn_on = !self.device.heater_on;
        self.send(Command::SetHeater(turn_on)).await;
    }

    /// Motor toggle based on the last reported state.
    pub async fn toggle_motor(&mut self) {
        let turn_on = !self.device.motor_on;
        self.send(Command::SetMotor(turn_on)).await;
    }

    /// Apply one step to a parameter and transmit its setpoint if it has
    /// one; returns the new (clamped) value.
    ///
    /// The heater bounds have no individual setpoint command and only reach
    /// the device through [`DeviceController::apply_configuration`].
    pub async fn nudge(&mut self, kind: ParamKind, direction: Direction) -> f32 {
        let value = self.params.get_mut(kind).nudge(direction);

        let command = match kind {
            ParamKind::Velocity => Some(Command::SetVelocity(value)),
            ParamKind::TargetTemp => Some(Command::SetTargetTemp(value)),
            ParamKind::MotorEngageTemp => Some(Command::SetMotorEngageTemp(value)),
            ParamKind::MinHeaterTemp | ParamKind::MaxHeaterTemp => None,
        };
        if let Some(command) = command {
            self.send(command).await;
        }

        value
    }

    /// Push the bulk configuration (`SET,vel,maxTemp,minMotorTemp`).
    ///
    /// Returns true when the command went out, false when not connected.
    pub async fn apply_configuration(&mut self) -> bool {
        self.send(Command::Configure {
            velocity: self.params.velocity.value,
            max_temp: self.params.max_heater_temp.value,
            motor_engage_temp: self.params.motor_engage_temp.value,
        })
        .await
    }

    async fn send(&mut self, command: Command) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match session.send(&command).await {
            Ok(sent) => sent,
            Err(e) => {
                self.on_link_loss(&e.to_string());
                false
            }
        }
    }

    fn on_link_loss(&mut self, error: &str) {
        self.device = DeviceState::unknown();
        self.status = format!("Disconnected: {error}");
    }
}

//! Connection worker thread
//!
//! The GUI never touches the transport. One worker thread owns the
//! [`DeviceController`] on a current-thread runtime and is the only writer:
//! interactive commands, held-button repeats, and the 100 ms telemetry
//! drain all funnel through its single command queue, so nothing ever
//! races on the serial handle. After every step the worker publishes a
//! snapshot and wakes the GUI.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;

use filacon_core::core::repeat::{self, RepeatHandle};
use filacon_core::{
    AppConfig, ControlParameters, DeviceController, DeviceState, Direction, LinkState, ParamKind,
};

/// Commands from GUI to the worker
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Open a session on the endpoint
    Connect(String),
    /// Close the session
    Disconnect,
    /// Flip the master system switch
    ToggleSystem,
    /// Flip the heater
    ToggleHeater,
    /// Flip the motor
    ToggleMotor,
    /// Apply one step to a parameter
    Nudge(ParamKind, Direction),
    /// A +/- control was pressed and is being held
    HoldStart(ParamKind, Direction),
    /// The held control was released
    HoldStop,
    /// Push the bulk configuration
    ApplyConfiguration,
    /// Stop the worker thread
    Shutdown,
}

/// State published to the GUI after every worker step
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Connection state
    pub link: LinkState,
    /// Last device snapshot
    pub device: DeviceState,
    /// Client-side setpoints
    pub params: ControlParameters,
    /// Connection status line
    pub status: String,
}

/// Messages from the worker to the GUI
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Fresh controller state
    Snapshot(Snapshot),
    /// Transient confirmation to flash in the status area
    Notice(String),
}

/// Handle the GUI keeps to its worker thread.
pub struct Worker {
    /// Command queue into the worker
    pub commands: UnboundedSender<WorkerCommand>,
    /// Event stream out of the worker
    pub events: Receiver<WorkerEvent>,
}

impl Worker {
    /// Spawn the worker thread.
    ///
    /// `ctx` is used to wake the GUI whenever a new snapshot is available.
    pub fn spawn(config: AppConfig, ctx: egui::Context) -> Self {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = std::sync::mpsc::channel();

        let repeat_tx = cmd_tx.clone();
        thread::Builder::new()
            .name("filacon-worker".to_string())
            .spawn(move || run(config, ctx, cmd_rx, event_tx, repeat_tx))
            .expect("worker thread spawn");

        Self {
            commands: cmd_tx,
            events: event_rx,
        }
    }

    /// Queue a command; the worker picks it up on its next step.
    pub fn send(&self, command: WorkerCommand) {
        let _ = self.commands.send(command);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
    }
}

fn snapshot_of(controller: &DeviceController) -> Snapshot {
    Snapshot {
        link: controller.link_state(),
        device: controller.device_state(),
        params: *controller.parameters(),
        status: controller.status().to_string(),
    }
}

fn run(
    config: AppConfig,
    ctx: egui::Context,
    mut commands: UnboundedReceiver<WorkerCommand>,
    events: Sender<WorkerEvent>,
    repeat_tx: UnboundedSender<WorkerCommand>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to build worker runtime");
            return;
        }
    };

    runtime.block_on(async move {
        let poll = Duration::from_millis(config.poll_interval_ms.max(10));
        let mut controller = DeviceController::with_serial_config(config.serial);
        let mut hold: Option<RepeatHandle> = None;

        let mut ticker = tokio::time::interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    controller.tick().await;
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    match command {
                        WorkerCommand::Connect(endpoint) => {
                            // Failure detail lands in the controller status
                            let _ = controller.connect(&endpoint).await;
                        }
                        WorkerCommand::Disconnect => {
                            hold = None;
                            controller.disconnect().await;
                        }
                        WorkerCommand::ToggleSystem => controller.toggle_system().await,
                        WorkerCommand::ToggleHeater => controller.toggle_heater().await,
                        WorkerCommand::ToggleMotor => controller.toggle_motor().await,
                        WorkerCommand::Nudge(kind, direction) => {
                            controller.nudge(kind, direction).await;
                        }
                        WorkerCommand::HoldStart(kind, direction) => {
                            let tx = repeat_tx.clone();
                            hold = Some(repeat::start(poll, move || {
                                let _ = tx.send(WorkerCommand::Nudge(kind, direction));
                            }));
                        }
                        WorkerCommand::HoldStop => {
                            // Dropping the handle cancels; nothing fires after this
                            hold = None;
                        }
                        WorkerCommand::ApplyConfiguration => {
                            let notice = if controller.apply_configuration().await {
                                "Configuration applied"
                            } else {
                                "Not connected"
                            };
                            let _ = events.send(WorkerEvent::Notice(notice.to_string()));
                        }
                        WorkerCommand::Shutdown => break,
                    }
                }
            }

            if events.send(WorkerEvent::Snapshot(snapshot_of(&controller))).is_err() {
                break;
            }
            ctx.request_repaint();
        }

        drop(hold);
        controller.disconnect().await;
        tracing::info!("worker stopped");
    });
}

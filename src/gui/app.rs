//! Main GUI application: one control panel for one extruder

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints};

use filacon_core::{
    AppConfig, ControlParameters, DeviceState, Direction, LinkState, ParamKind,
};

use super::theme::{self, Theme};
use super::worker::{Worker, WorkerCommand, WorkerEvent};

/// How long a transient confirmation stays in the status area.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Points kept in the live temperature chart (~60 s at 10 Hz).
const CHART_CAPACITY: usize = 600;

/// The Filacon control panel.
pub struct FilaconApp {
    worker: Worker,
    theme: Theme,

    // Port selection
    ports: Vec<String>,
    selected_port: String,

    // Last snapshot from the worker
    link: LinkState,
    device: DeviceState,
    params: ControlParameters,
    status: String,

    // Transient confirmation (e.g. "Configuration applied")
    notice: Option<(String, Instant)>,

    // Live chart, presentation-only
    temp_history: VecDeque<[f64; 2]>,
    started: Instant,

    active_hold: Option<(ParamKind, Direction)>,
}

impl FilaconApp {
    /// Build the app and spawn its connection worker.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::default();
        let theme = if config.window.dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        };
        theme.apply(&cc.egui_ctx);

        let ports = filacon_core::list_endpoints();
        let selected_port = ports.first().cloned().unwrap_or_default();

        Self {
            worker: Worker::spawn(config, cc.egui_ctx.clone()),
            theme,
            ports,
            selected_port,
            link: LinkState::Disconnected,
            device: DeviceState::unknown(),
            params: ControlParameters::default(),
            status: "Disconnected".to_string(),
            notice: None,
            temp_history: VecDeque::with_capacity(CHART_CAPACITY),
            started: Instant::now(),
            active_hold: None,
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.worker.events.try_recv() {
            match event {
                WorkerEvent::Snapshot(snapshot) => {
                    self.link = snapshot.link;
                    self.device = snapshot.device;
                    self.params = snapshot.params;
                    self.status = snapshot.status;

                    if self.device.has_reading() {
                        let t = self.started.elapsed().as_secs_f64();
                        self.temp_history
                            .push_back([t, f64::from(self.device.temperature_c)]);
                        while self.temp_history.len() > CHART_CAPACITY {
                            self.temp_history.pop_front();
                        }
                    }
                }
                WorkerEvent::Notice(text) => {
                    self.notice = Some((text, Instant::now()));
                }
            }
        }
    }

    fn refresh_ports(&mut self) {
        self.ports = filacon_core::list_endpoints();
        if !self.ports.contains(&self.selected_port) {
            self.selected_port = self.ports.first().cloned().unwrap_or_default();
        }
    }

    fn connection_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("serial_port")
                .selected_text(&self.selected_port)
                .width(160.0)
                .show_ui(ui, |ui| {
                    for port in &self.ports {
                        ui.selectable_value(&mut self.selected_port, port.clone(), port);
                    }
                });

            if ui.button("⟳").on_hover_text("Refresh port list").clicked() {
                self.refresh_ports();
            }

            let connected = self.link.is_connected();
            let label = if connected { "Disconnect" } else { "Connect" };
            let connect_allowed =
                connected || !filacon_core::is_placeholder(&self.selected_port);
            if ui
                .add_enabled(connect_allowed, egui::Button::new(label))
                .clicked()
            {
                if connected {
                    self.worker.send(WorkerCommand::Disconnect);
                } else {
                    self.worker
                        .send(WorkerCommand::Connect(self.selected_port.clone()));
                }
            }

            if ui.button("Theme").on_hover_text("Toggle light/dark").clicked() {
                self.theme = self.theme.toggled();
                self.theme.apply(ui.ctx());
            }
        });
    }

    fn temperature_display(&self, ui: &mut egui::Ui) {
        let (text, color) = if self.device.has_reading() {
            (
                format!("{:.2} °C", self.device.temperature_c),
                theme::temperature_color(self.device.temperature_c),
            )
        } else {
            ("--.-- °C".to_string(), theme::COLOR_NO_READING)
        };

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(text).monospace().size(42.0).color(color));

            let motor = if self.device.motor_on {
                format!("{:.2} mm/s", self.device.target_velocity)
            } else {
                "motor off".to_string()
            };
            ui.label(RichText::new(motor).monospace().size(18.0));
        });
    }

    fn temperature_chart(&self, ui: &mut egui::Ui) {
        let points: PlotPoints = self.temp_history.iter().copied().collect();
        Plot::new("temperature_chart")
            .height(130.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show_x(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points));
            });
    }

    fn toggle_button(
        ui: &mut egui::Ui,
        enabled: bool,
        on: bool,
        label_on: &str,
        label_off: &str,
        off_color: Color32,
    ) -> bool {
        let (label, fill) = if on {
            (label_on, theme::COLOR_ON)
        } else {
            (label_off, off_color)
        };
        ui.add_enabled(enabled, egui::Button::new(label).fill(fill))
            .clicked()
    }

    fn toggles(&mut self, ui: &mut egui::Ui) {
        let connected = self.link.is_connected();

        ui.vertical_centered_justified(|ui| {
            if Self::toggle_button(
                ui,
                connected,
                self.device.system_on,
                "Turn system off",
                "Start system",
                theme::COLOR_NEUTRAL,
            ) {
                self.worker.send(WorkerCommand::ToggleSystem);
            }
        });

        ui.columns(2, |columns| {
            if Self::toggle_button(
                &mut columns[0],
                connected,
                self.device.heater_on,
                "Heater on",
                "Heater off",
                theme::COLOR_OFF,
            ) {
                self.worker.send(WorkerCommand::ToggleHeater);
            }
            if Self::toggle_button(
                &mut columns[1],
                connected,
                self.device.motor_on,
                "Motor on",
                "Motor off",
                theme::COLOR_OFF,
            ) {
                self.worker.send(WorkerCommand::ToggleMotor);
            }
        });
    }

    /// A held +/- control: starts repeating on press, stops on release.
    fn hold_button(
        &mut self,
        ui: &mut egui::Ui,
        text: &str,
        kind: ParamKind,
        direction: Direction,
    ) {
        let response = ui.add_sized([28.0, 20.0], egui::Button::new(text));
        let this = (kind, direction);

        if response.is_pointer_button_down_on() {
            if self.active_hold != Some(this) {
                if self.active_hold.is_some() {
                    self.worker.send(WorkerCommand::HoldStop);
                }
                self.worker.send(WorkerCommand::HoldStart(kind, direction));
                self.active_hold = Some(this);
            }
        } else if self.active_hold == Some(this) {
            self.worker.send(WorkerCommand::HoldStop);
            self.active_hold = None;
        }
    }

    fn parameter_row(&mut self, ui: &mut egui::Ui, kind: ParamKind) {
        let param = *self.params.get(kind);
        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new(kind.label()));
            self.hold_button(ui, "−", kind, Direction::Down);
            ui.add_sized(
                [90.0, 20.0],
                egui::Label::new(
                    RichText::new(format!("{:.2} {}", param.value, kind.unit())).monospace(),
                ),
            );
            self.hold_button(ui, "+", kind, Direction::Up);
        });
    }

    fn status_area(&mut self, ui: &mut egui::Ui) {
        // Expire stale confirmations
        if self
            .notice
            .as_ref()
            .is_some_and(|(_, since)| since.elapsed() > NOTICE_TTL)
        {
            self.notice = None;
        }

        ui.horizontal(|ui| {
            let color = if self.link.is_connected() {
                theme::COLOR_ON
            } else {
                theme::COLOR_NO_READING
            };
            let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 5.0, color);
            ui.label(&self.status);

            if let Some((notice, _)) = &self.notice {
                ui.separator();
                ui.label(RichText::new(notice).color(theme::COLOR_ON));
            }
        });
    }
}

impl eframe::App for FilaconApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::TopBottomPanel::top("connection").show(ctx, |ui| {
            ui.add_space(4.0);
            self.connection_row(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.add_space(2.0);
            self.status_area(ui);
            ui.add_space(2.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.temperature_display(ui);
            ui.add_space(8.0);
            self.temperature_chart(ui);
            ui.separator();

            self.toggles(ui);
            ui.separator();

            for kind in ParamKind::all() {
                self.parameter_row(ui, *kind);
            }

            ui.add_space(6.0);
            ui.vertical_centered_justified(|ui| {
                if ui.button("Apply configuration").clicked() {
                    self.worker.send(WorkerCommand::ApplyConfiguration);
                }
            });
        });

        // Keep polling for snapshots even when no input arrives
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

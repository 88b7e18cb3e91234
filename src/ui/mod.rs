// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell hosting the attachment staging panel.
//! Handles layout, the reset-signal control, and the command worker pool.

pub mod components;

use eframe::egui;

use crate::config::HostConfig;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{attachments, toggle_switch};

/// Stateful egui application for staging attachments.
pub struct StagerApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl StagerApp {
    pub fn new(config: &HostConfig) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::from_config(config),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for StagerApp {
    /// Required by eframe 0.34; eframe still calls [`Self::update`] first
    /// each frame, which does all the work here.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame.
    ///
    /// Drains worker replies, samples the reset level, applies queued
    /// messages in arrival order, then renders the panels. Views push new
    /// messages for the next frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }
        self.inbox.push(Msg::Tick);

        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Attachments");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_reset_control(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_policy_editor(ui);
                ui.add_space(8.0);
                let att_msgs = attachments::view(ui, &self.model.attachments);
                self.inbox
                    .extend(att_msgs.into_iter().map(Msg::Attachments));
                ui.add_space(12.0);
                self.render_output(ui);
            });
        });

        // Keep sampling while workers are busy so replies are picked up promptly.
        if self.model.pending_commands > 0 {
            ctx.request_repaint();
        }
    }
}

impl StagerApp {
    /// Switch standing in for the host's reset input parameter.
    fn render_reset_control(&mut self, ui: &mut egui::Ui) {
        let mut level = self.model.reset_signal;
        ui.label(
            egui::RichText::new(format!("epoch {}", self.model.attachments.epoch()))
                .small()
                .color(egui::Color32::from_gray(110)),
        );
        if toggle_switch(ui, &mut level, "Reset")
            .on_hover_text("Clears all attachments when switched on")
            .changed()
        {
            self.inbox.push(Msg::SetResetSignal(level));
        }
    }

    /// Editable policy standing in for the host's type and limit parameters.
    fn render_policy_editor(&mut self, ui: &mut egui::Ui) {
        let mut policy = self.model.attachments.policy().clone();
        let mut changed = false;
        egui::CollapsingHeader::new("Policy")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("policy_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Allowed types");
                        changed |= ui
                            .add(
                                egui::TextEdit::singleline(&mut policy.allowed_types)
                                    .hint_text(".pdf, image/*"),
                            )
                            .changed();
                        ui.end_row();

                        ui.label("Max files");
                        changed |= ui
                            .add(egui::DragValue::new(&mut policy.max_files).range(1..=1000))
                            .changed();
                        ui.end_row();

                        ui.label("Max size (bytes)");
                        changed |= ui
                            .add(
                                egui::DragValue::new(&mut policy.max_file_size_bytes)
                                    .range(1..=u64::MAX)
                                    .speed(1024.0),
                            )
                            .changed();
                        ui.end_row();
                    });
            });
        if changed {
            self.inbox.push(Msg::SetPolicy(policy));
        }
    }

    /// Collapsible read-only view of the JSON handed to the host.
    fn render_output(&mut self, ui: &mut egui::Ui) {
        let label = if self.model.show_json {
            format!("{} Hide output", egui_phosphor::regular::CARET_DOWN)
        } else {
            format!("{} Show output", egui_phosphor::regular::CARET_RIGHT)
        };
        if ui.button(label).clicked() {
            self.inbox.push(Msg::ToggleJson);
        }
        if self.model.show_json {
            let mut text = self.model.output_json.as_str();
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(6),
            );
        }
    }

    /// Render a simple modal window for host-level errors.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Attachment error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} working…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text(format!(
                            "{} task(s) running in background",
                            self.model.pending_commands
                        ));
                }
            });
        }
    }
}

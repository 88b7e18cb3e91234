// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use crate::config::HostConfig;
use crate::logic::{PendingBatch, StagingEngine};
use crate::models::{PolicySpec, RawFile};
use crate::ui::components::attachments::{
    self, AttachmentsCommand, AttachmentsEvent, AttachmentsModel, AttachmentsMsg,
};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Attachment staging state.
    pub attachments: AttachmentsModel,
    /// Host reset level fed to the engine every update cycle.
    pub reset_signal: bool,
    /// Whether the JSON snapshot preview is expanded.
    pub show_json: bool,
    /// Host-facing JSON snapshot, refreshed whenever the set changes.
    pub output_json: String,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest host-level error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn from_config(config: &HostConfig) -> Self {
        let mut model = Self {
            attachments: AttachmentsModel::new(config.policy.clone()),
            reset_signal: config.reset_signal,
            ..Default::default()
        };
        refresh_output(&mut model);
        model
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    SetResetSignal(bool),
    /// Host edited the admission policy.
    SetPolicy(PolicySpec),
    ToggleJson,
    DismissError,
    /// Start of an update cycle: the reset level is sampled here.
    Tick,
    Attachments(AttachmentsMsg),
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickFiles,
    EncodeBatch(PendingBatch),
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::SetResetSignal(level) => model.reset_signal = level,
        Msg::SetPolicy(policy) => {
            route_attachments(model, AttachmentsMsg::PolicyChanged(policy), cmds)
        }
        Msg::ToggleJson => model.show_json = !model.show_json,
        Msg::DismissError => model.error = None,
        Msg::Tick => {
            let level = model.reset_signal;
            route_attachments(model, AttachmentsMsg::SampleReset(level), cmds);
        }
        Msg::Attachments(m) => route_attachments(model, m, cmds),
    }
}

fn route_attachments(model: &mut AppModel, msg: AttachmentsMsg, cmds: &mut Vec<Command>) {
    let mut att_cmds = Vec::new();
    if let Some(event) = attachments::update(&mut model.attachments, msg, &mut att_cmds) {
        surface_event(model, event);
    }
    for c in att_cmds {
        match c {
            AttachmentsCommand::PickFiles => cmds.push(Command::PickFiles),
            AttachmentsCommand::EncodeBatch(batch) => cmds.push(Command::EncodeBatch(batch)),
        }
    }
}

/// Execute a command synchronously and return a resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickFiles => {
            let paths = rfd::FileDialog::new()
                .set_title("Select attachments")
                .pick_files()
                .unwrap_or_default();
            let files: anyhow::Result<Vec<RawFile>> =
                paths.iter().map(|path| RawFile::from_path(path)).collect();
            match files {
                Ok(files) => Msg::Attachments(AttachmentsMsg::FilesPicked(files)),
                Err(err) => Msg::Attachments(AttachmentsMsg::PickFailed(format!("{err:#}"))),
            }
        }
        Command::EncodeBatch(batch) => {
            let result = StagingEngine::encode(&batch);
            Msg::Attachments(AttachmentsMsg::EncodeFinished { batch, result })
        }
    }
}

/// Update status/error fields consistently for user feedback.
///
/// Engine errors stay on the attachments panel; only host-level failures
/// (reading the selection) open the modal.
fn surface_event(model: &mut AppModel, event: AttachmentsEvent) {
    if event.set_changed {
        refresh_output(model);
    }
    if event.is_error && model.attachments.error_message().is_empty() {
        model.error = Some(event.message.clone());
    }
    model.status = Some(event.message);
}

/// Re-render the JSON snapshot handed to the host.
fn refresh_output(model: &mut AppModel) {
    model.output_json = match model.attachments.snapshot().to_json() {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize attachments");
            String::new()
        }
    };
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Attachments panel: MVU glue around the staging engine plus its egui view.

use std::collections::VecDeque;

use eframe::egui;

use crate::error::StagingError;
use crate::logic::{PendingBatch, ResetTransition, StagingEngine};
use crate::models::{Attachment, AttachmentSet, PolicySpec, RawFile};
use crate::utils::{format_bytes, icon_for};

/// MVU state for the attachment picker.
#[derive(Default)]
pub struct AttachmentsModel {
    engine: StagingEngine,
    policy: PolicySpec,
    encoding: bool,
    queued: VecDeque<Vec<RawFile>>,
}

/// Messages emitted by the attachments view or by command results.
pub enum AttachmentsMsg {
    RequestPickFiles,
    FilesPicked(Vec<RawFile>),
    PickFailed(String),
    EncodeFinished {
        batch: PendingBatch,
        result: Result<Vec<Attachment>, StagingError>,
    },
    Remove(usize),
    /// Host reset level, sampled once per update cycle.
    SampleReset(bool),
    /// Host supplied a new policy; applies to the next admission.
    PolicyChanged(PolicySpec),
    DismissError,
}

/// Side-effectful commands that can be run off the UI path.
pub enum AttachmentsCommand {
    PickFiles,
    EncodeBatch(PendingBatch),
}

/// User-facing events for status/error surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentsEvent {
    /// Message text to display.
    pub message: String,
    /// Whether the message represents an error.
    pub is_error: bool,
    /// Whether the host should pick up a new snapshot of the set.
    pub set_changed: bool,
}

impl AttachmentsEvent {
    fn status(message: impl Into<String>, set_changed: bool) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            set_changed,
        }
    }

    fn error(err: &StagingError) -> Self {
        Self {
            message: err.to_string(),
            is_error: true,
            set_changed: false,
        }
    }

    /// Combine two events from one update; the later message wins but a set
    /// change reported by either is kept.
    fn then(earlier: Option<Self>, later: Option<Self>) -> Option<Self> {
        match (earlier, later) {
            (Some(earlier), Some(later)) => Some(Self {
                set_changed: earlier.set_changed || later.set_changed,
                ..later
            }),
            (earlier, later) => later.or(earlier),
        }
    }
}

impl AttachmentsModel {
    pub fn new(policy: PolicySpec) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Current attachments in selection order.
    pub fn attachments(&self) -> &AttachmentSet {
        self.engine.attachments()
    }

    pub fn snapshot(&self) -> AttachmentSet {
        self.engine.snapshot()
    }

    pub fn policy(&self) -> &PolicySpec {
        &self.policy
    }

    pub fn epoch(&self) -> u64 {
        self.engine.epoch().value()
    }

    /// Current error description; empty when none.
    pub fn error_message(&self) -> &str {
        self.engine.error_message()
    }

    pub fn is_encoding(&self) -> bool {
        self.encoding
    }

    pub fn queued_selections(&self) -> usize {
        self.queued.len()
    }
}

/// Apply a message to the attachments model. Returns a user-facing event when relevant.
pub fn update(
    model: &mut AttachmentsModel,
    msg: AttachmentsMsg,
    cmds: &mut Vec<AttachmentsCommand>,
) -> Option<AttachmentsEvent> {
    match msg {
        AttachmentsMsg::RequestPickFiles => {
            cmds.push(AttachmentsCommand::PickFiles);
            None
        }
        AttachmentsMsg::FilesPicked(files) => {
            if model.encoding {
                model.queued.push_back(files);
                return Some(AttachmentsEvent::status(
                    "Waiting for the previous selection to finish...",
                    false,
                ));
            }
            admit(model, files, cmds)
        }
        AttachmentsMsg::PickFailed(reason) => Some(AttachmentsEvent {
            message: format!("Failed to read selection:\n\n{reason}"),
            is_error: true,
            set_changed: false,
        }),
        AttachmentsMsg::EncodeFinished { batch, result } => {
            model.encoding = false;
            let added = batch.files().len();
            let event = match model.engine.finish_batch(batch, result) {
                Ok(true) => Some(AttachmentsEvent::status(
                    format!("Added {added} attachment(s)"),
                    true,
                )),
                Ok(false) => None,
                Err(err) => Some(AttachmentsEvent::error(&err)),
            };
            let next = drain_queue(model, cmds);
            AttachmentsEvent::then(event, next)
        }
        AttachmentsMsg::Remove(index) => {
            if index >= model.engine.attachments().len() {
                return None;
            }
            let removed = model.engine.remove(index);
            Some(AttachmentsEvent::status(
                format!("Removed {}", removed.name),
                true,
            ))
        }
        AttachmentsMsg::SampleReset(level) => match model.engine.observe_reset(level) {
            ResetTransition::Fired(_) => {
                model.queued.clear();
                Some(AttachmentsEvent::status("Attachments cleared", true))
            }
            ResetTransition::Rearmed | ResetTransition::Steady => None,
        },
        AttachmentsMsg::PolicyChanged(policy) => {
            if let Err(err) = policy.validate() {
                tracing::warn!(error = %err, "ignoring invalid policy");
                return Some(AttachmentsEvent {
                    message: format!("Policy not applied: {err}"),
                    is_error: true,
                    set_changed: false,
                });
            }
            model.policy = policy;
            None
        }
        AttachmentsMsg::DismissError => {
            model.engine.clear_error();
            None
        }
    }
}

/// Run admission for one selection and enqueue its encoding.
fn admit(
    model: &mut AttachmentsModel,
    files: Vec<RawFile>,
    cmds: &mut Vec<AttachmentsCommand>,
) -> Option<AttachmentsEvent> {
    match model.engine.begin_batch(&files, &model.policy) {
        Ok(Some(batch)) => {
            model.encoding = true;
            let count = batch.files().len();
            cmds.push(AttachmentsCommand::EncodeBatch(batch));
            Some(AttachmentsEvent::status(
                format!("Processing {count} attachment(s)..."),
                false,
            ))
        }
        Ok(None) => None,
        Err(err) => Some(AttachmentsEvent::error(&err)),
    }
}

/// Start the next queued selection, if any, once the encoder is idle.
fn drain_queue(
    model: &mut AttachmentsModel,
    cmds: &mut Vec<AttachmentsCommand>,
) -> Option<AttachmentsEvent> {
    let mut last = None;
    while !model.encoding {
        let Some(files) = model.queued.pop_front() else {
            break;
        };
        if let Some(event) = admit(model, files, cmds) {
            last = Some(event);
        }
    }
    last
}

/// Render the attachments panel and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &AttachmentsModel) -> Vec<AttachmentsMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        let add = egui::Button::new(format!("{} Add files", egui_phosphor::regular::PLUS));
        if ui
            .add_enabled(!model.encoding, add)
            .on_hover_text("Add files")
            .on_disabled_hover_text("Encoding the previous selection")
            .clicked()
        {
            msgs.push(AttachmentsMsg::RequestPickFiles);
        }
        if model.encoding {
            ui.add(egui::Spinner::new().size(14.0));
        }
        ui.label(
            egui::RichText::new(policy_summary(&model.policy))
                .small()
                .color(egui::Color32::from_gray(110)),
        );
    });

    if !model.error_message().is_empty() {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{} {}",
                    egui_phosphor::regular::WARNING,
                    model.error_message()
                ))
                .color(egui::Color32::from_rgb(232, 89, 12)),
            );
            if ui.small_button(egui_phosphor::regular::X).clicked() {
                msgs.push(AttachmentsMsg::DismissError);
            }
        });
    }

    ui.add_space(6.0);

    let visuals = ui.visuals().clone();
    egui::Frame::new()
        .fill(visuals.panel_fill)
        .stroke(visuals.window_stroke())
        .inner_margin(8.0)
        .show(ui, |ui| {
            if model.attachments().is_empty() {
                ui.label(
                    egui::RichText::new("No attachments").color(egui::Color32::from_gray(150)),
                );
            } else {
                render_attachment_list(ui, model, &mut msgs);
            }
        });

    msgs
}

/// Render the list of attachments with icons and remove controls.
fn render_attachment_list(
    ui: &mut egui::Ui,
    model: &AttachmentsModel,
    msgs: &mut Vec<AttachmentsMsg>,
) {
    let items = model.attachments().items();
    for (index, item) in items.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(icon_for(&item.declared_content_type, &item.extension))
                    .size(20.0),
            );

            ui.vertical(|ui| {
                ui.label(&item.name);
                ui.label(
                    egui::RichText::new(format!(
                        "{} | {}",
                        item.declared_content_type,
                        format_bytes(decoded_len(&item.encoded_content))
                    ))
                    .small()
                    .color(egui::Color32::from_gray(90)),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE))
                    .on_hover_text("Remove attached file")
                    .clicked()
                {
                    msgs.push(AttachmentsMsg::Remove(index));
                }
            });
        });

        if index + 1 < items.len() {
            ui.separator();
        }
    }
}

/// One-line description of the active policy.
fn policy_summary(policy: &PolicySpec) -> String {
    let types = if policy.allowed_types.trim().is_empty() {
        "*"
    } else {
        policy.allowed_types.trim()
    };
    format!(
        "Types: {} | up to {} file(s) | max {} each",
        types,
        policy.max_files,
        format_bytes(policy.max_file_size_bytes)
    )
}

/// Payload size recovered from the base64 length.
fn decoded_len(encoded: &str) -> u64 {
    let padding = encoded.bytes().rev().take_while(|b| *b == b'=').count();
    ((encoded.len() / 4) * 3).saturating_sub(padding) as u64
}

#[cfg(test)]
mod tests {
    use super::{
        AttachmentsCommand, AttachmentsModel, AttachmentsMsg, decoded_len, policy_summary, update,
    };
    use crate::logic::StagingEngine;
    use crate::logic::encode::test_support::broken;
    use crate::models::{PolicySpec, RawFile};

    fn file(name: &str, size: usize) -> RawFile {
        RawFile::from_bytes(name, vec![1u8; size])
    }

    /// Run every queued encode command the way a worker would.
    fn run_encodes(model: &mut AttachmentsModel, mut cmds: Vec<AttachmentsCommand>) {
        while let Some(cmd) = cmds.pop() {
            if let AttachmentsCommand::EncodeBatch(batch) = cmd {
                let result = StagingEngine::encode(&batch);
                let mut next = Vec::new();
                update(
                    model,
                    AttachmentsMsg::EncodeFinished { batch, result },
                    &mut next,
                );
                cmds.extend(next);
            }
        }
    }

    fn names(model: &AttachmentsModel) -> Vec<String> {
        model
            .attachments()
            .items()
            .iter()
            .map(|a| a.name.clone())
            .collect()
    }

    #[test]
    fn picked_files_are_encoded_off_the_update_path() {
        let mut model = AttachmentsModel::new(PolicySpec::new(".pdf", 2, 1000));
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("a.pdf", 500)]),
            &mut cmds,
        )
        .expect("processing event");

        assert!(!event.is_error);
        assert!(model.is_encoding());
        assert!(model.attachments().is_empty(), "nothing merged before encode");
        assert_eq!(cmds.len(), 1);

        run_encodes(&mut model, cmds);

        assert!(!model.is_encoding());
        assert_eq!(names(&model), ["a.pdf"]);
    }

    #[test]
    fn selection_during_encode_is_queued_then_admitted() {
        let mut model = AttachmentsModel::new(PolicySpec::new("", 5, 1000));
        let mut cmds = Vec::new();

        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("a.pdf", 5)]),
            &mut cmds,
        );
        let mut more = Vec::new();
        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("b.pdf", 5)]),
            &mut more,
        );

        assert!(more.is_empty(), "second batch waits for the first");
        assert_eq!(model.queued_selections(), 1);

        run_encodes(&mut model, cmds);

        assert_eq!(model.queued_selections(), 0);
        assert_eq!(names(&model), ["a.pdf", "b.pdf"]);
    }

    #[test]
    fn merge_is_reported_when_queued_selection_is_rejected() {
        let mut model = AttachmentsModel::new(PolicySpec::new(".pdf", 2, 1000));
        let mut cmds = Vec::new();
        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("a.pdf", 5)]),
            &mut cmds,
        );
        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("b.txt", 5)]),
            &mut Vec::new(),
        );

        let Some(AttachmentsCommand::EncodeBatch(batch)) = cmds.pop() else {
            panic!("expected an encode command");
        };
        let result = StagingEngine::encode(&batch);
        let event = update(
            &mut model,
            AttachmentsMsg::EncodeFinished { batch, result },
            &mut cmds,
        )
        .expect("finish event");

        assert!(event.set_changed, "merged set must still be reported");
        assert!(event.is_error);
        assert!(event.message.contains("b.txt"));
        assert_eq!(names(&model), ["a.pdf"]);
    }

    #[test]
    fn policy_change_applies_to_next_selection() {
        let mut model = AttachmentsModel::new(PolicySpec::new(".pdf", 2, 1000));
        let mut cmds = Vec::new();

        update(
            &mut model,
            AttachmentsMsg::PolicyChanged(PolicySpec::new(".txt", 2, 1000)),
            &mut cmds,
        );
        assert_eq!(model.policy().allowed_types, ".txt");

        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("b.txt", 5)]),
            &mut cmds,
        );
        run_encodes(&mut model, cmds);
        assert_eq!(names(&model), ["b.txt"]);
    }

    #[test]
    fn invalid_policy_is_refused() {
        let mut model = AttachmentsModel::new(PolicySpec::new(".pdf", 2, 1000));

        let event = update(
            &mut model,
            AttachmentsMsg::PolicyChanged(PolicySpec::new(".txt", 0, 1000)),
            &mut Vec::new(),
        )
        .expect("error event");

        assert!(event.is_error);
        assert_eq!(model.policy(), &PolicySpec::new(".pdf", 2, 1000));
    }

    #[test]
    fn rejected_batch_surfaces_error_without_commands() {
        let mut model = AttachmentsModel::new(PolicySpec::new(".pdf", 2, 1000));
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("a.pdf", 5), file("b.txt", 5)]),
            &mut cmds,
        )
        .expect("error event");

        assert!(event.is_error);
        assert!(cmds.is_empty());
        assert!(model.error_message().contains("b.txt"));

        update(&mut model, AttachmentsMsg::DismissError, &mut cmds);
        assert_eq!(model.error_message(), "");
    }

    #[test]
    fn decode_failure_is_reported_and_nothing_merges() {
        let mut model = AttachmentsModel::new(PolicySpec::new("", 5, 1000));
        let mut cmds = Vec::new();

        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("ok.pdf", 5), broken("bad.pdf")]),
            &mut cmds,
        );
        run_encodes(&mut model, cmds);

        assert!(model.attachments().is_empty());
        assert!(model.error_message().contains("bad.pdf"));
        assert!(!model.is_encoding());
    }

    #[test]
    fn reset_while_encoding_discards_the_stale_batch() {
        let mut model = AttachmentsModel::new(PolicySpec::new("", 5, 1000));
        let mut cmds = Vec::new();
        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("a.pdf", 5)]),
            &mut cmds,
        );

        let event = update(&mut model, AttachmentsMsg::SampleReset(true), &mut Vec::new())
            .expect("reset event");
        assert!(event.set_changed && !event.is_error);

        run_encodes(&mut model, cmds);

        assert!(model.attachments().is_empty());
        assert_eq!(model.error_message(), "");
    }

    #[test]
    fn reset_is_edge_triggered() {
        let mut model = AttachmentsModel::new(PolicySpec::new("", 5, 1000));
        let mut cmds = Vec::new();
        let epoch = model.epoch();

        assert!(update(&mut model, AttachmentsMsg::SampleReset(false), &mut cmds).is_none());
        assert!(update(&mut model, AttachmentsMsg::SampleReset(true), &mut cmds).is_some());
        let fired_epoch = model.epoch();
        assert_ne!(fired_epoch, epoch);

        assert!(update(&mut model, AttachmentsMsg::SampleReset(true), &mut cmds).is_none());
        assert!(update(&mut model, AttachmentsMsg::SampleReset(false), &mut cmds).is_none());
        assert_eq!(model.epoch(), fired_epoch);
    }

    #[test]
    fn remove_ignores_stale_indices() {
        let mut model = AttachmentsModel::new(PolicySpec::new("", 5, 1000));
        let mut cmds = Vec::new();
        update(
            &mut model,
            AttachmentsMsg::FilesPicked(vec![file("a.pdf", 5)]),
            &mut cmds,
        );
        run_encodes(&mut model, cmds);

        assert!(update(&mut model, AttachmentsMsg::Remove(3), &mut Vec::new()).is_none());
        let event = update(&mut model, AttachmentsMsg::Remove(0), &mut Vec::new())
            .expect("removal event");

        assert!(event.set_changed);
        assert!(model.attachments().is_empty());
    }

    #[test]
    fn policy_summary_reports_limits() {
        let summary = policy_summary(&PolicySpec::new("", 3, 2048));

        assert_eq!(summary, "Types: * | up to 3 file(s) | max 2.0 KB each");
    }

    #[test]
    fn decoded_len_accounts_for_padding() {
        assert_eq!(decoded_len("aGVsbG8="), 5);
        assert_eq!(decoded_len("YQ=="), 1);
        assert_eq!(decoded_len(""), 0);
    }
}

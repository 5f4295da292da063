//! What the user sees at each point of the session, derived only from the
//! controller's phase and entities.

use serde::Serialize;

use super::controller::WorkflowController;
use super::phase::{OperationFlags, WorkflowPhase};

pub const NO_SUBJECT: &str = "(no subject)";
const NO_PREVIEW: &str = "(no preview)";
const PREVIEW_LIMIT: usize = 120;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowView {
    pub phase: WorkflowPhase,
    pub busy: Option<&'static str>,
    pub error: Option<String>,
    pub unread: Vec<SummaryRow>,
    pub composer: Option<ComposerView>,
    pub reply: Option<String>,
    pub affordances: Affordances,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub position: usize,
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerView {
    pub sender_name: String,
    pub sender_address: String,
    pub subject: String,
    pub email_body: String,
    pub calendar_notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub can_fetch: bool,
    pub can_select: bool,
    pub can_generate: bool,
    pub can_send: bool,
}

pub fn project(controller: &WorkflowController) -> WorkflowView {
    let selected = controller.selected();

    let unread = if selected.is_none() {
        controller
            .summaries()
            .iter()
            .enumerate()
            .map(|(index, summary)| SummaryRow {
                position: index + 1,
                id: summary.id.clone(),
                sender: summary.sender.clone(),
                subject: display_subject(Some(&summary.subject)),
                preview: format_preview(&summary.snippet),
            })
            .collect()
    } else {
        Vec::new()
    };

    let composer = selected.map(|message| {
        let draft = controller.draft();
        ComposerView {
            sender_name: message.sender_display_name.clone(),
            sender_address: message.sender_address.clone(),
            subject: display_subject(message.subject.as_deref()),
            email_body: draft.email_body.clone(),
            calendar_notes: draft.calendar_notes.clone(),
        }
    });

    let reply = Some(controller.draft().generated_reply.clone()).filter(|reply| !reply.is_empty());

    WorkflowView {
        phase: controller.phase(),
        busy: busy_label(controller.flags()),
        error: controller.error().map(|error| error.message.clone()),
        unread,
        composer,
        reply,
        affordances: Affordances {
            can_fetch: controller.can_request_list(),
            can_select: controller.can_select_any(),
            can_generate: controller.can_generate(),
            can_send: controller.can_send(),
        },
    }
}

pub fn busy_label(flags: OperationFlags) -> Option<&'static str> {
    if flags.is_fetching_list {
        Some("Fetching Emails...")
    } else if flags.is_loading_content {
        Some("Loading Email...")
    } else if flags.is_generating {
        Some("Generating Reply...")
    } else if flags.is_sending {
        Some("Sending...")
    } else {
        None
    }
}

pub fn display_subject(subject: Option<&str>) -> String {
    match subject.map(str::trim) {
        Some(subject) if !subject.is_empty() => subject.to_string(),
        _ => NO_SUBJECT.to_string(),
    }
}

fn format_preview(snippet: &str) -> String {
    let decoded = html_escape::decode_html_entities(snippet).to_string();
    let compact = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.is_empty() {
        return NO_PREVIEW.to_string();
    }

    if compact.len() <= PREVIEW_LIMIT {
        return compact;
    }

    let mut end = PREVIEW_LIMIT;
    while !compact.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &compact[..end])
}

use serde::Serialize;

use crate::api::models::{MessageContent, MessageSummary};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedMessage {
    pub id: String,
    pub sender_display_name: String,
    pub sender_address: String,
    /// `None` when the message carried no subject header. Never defaulted.
    pub subject: Option<String>,
    pub body: String,
}

impl SelectedMessage {
    pub fn from_content(id: String, content: MessageContent) -> Self {
        Self {
            id,
            sender_display_name: content.sender_name,
            sender_address: content.sender_full,
            subject: content.subject,
            body: content.body,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftState {
    pub email_body: String,
    pub calendar_notes: String,
    pub generated_reply: String,
}

impl DraftState {
    pub fn seeded(email_body: &str, calendar_notes: &str) -> Self {
        Self {
            email_body: email_body.to_string(),
            calendar_notes: calendar_notes.to_string(),
            generated_reply: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Service,
    EmptyResult,
    Precondition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorState {
    pub fn from_error(err: &AppError) -> Self {
        let kind = match err {
            AppError::Service(_) => ErrorKind::Service,
            AppError::EmptyResult(_) => ErrorKind::EmptyResult,
            AppError::Precondition(_) | AppError::InvalidInput(_) => ErrorKind::Precondition,
            _ => ErrorKind::Transport,
        };

        Self {
            kind,
            message: err.to_string(),
        }
    }

    pub fn to_error(&self) -> AppError {
        let message = self.message.clone();
        match self.kind {
            ErrorKind::Transport => AppError::Transport(message),
            ErrorKind::Service => AppError::Service(message),
            ErrorKind::EmptyResult => AppError::EmptyResult(message),
            ErrorKind::Precondition => AppError::Precondition(message),
        }
    }
}

/// Everything that belongs to one triage pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub summaries: Vec<MessageSummary>,
    pub selected: Option<SelectedMessage>,
    pub draft: DraftState,
}

impl Session {
    pub fn contains(&self, id: &str) -> bool {
        self.summaries.iter().any(|summary| summary.id == id)
    }
}

//! Triage session state machine.
//!
//! Every action is split in two: `begin_*` validates the current phase and
//! moves into the matching loading phase, `finish_*` applies the result of
//! that exact request. The async action methods chain the two around one
//! [`MailService`] call.

use crate::api::MailService;
use crate::api::models::{DraftRequest, MessageContent, MessageSummary, SendReceipt, SendRequest};
use crate::error::{AppError, AppResult};

use super::phase::{OperationFlags, OperationKind, OperationToken, WorkflowPhase};
use super::state::{DraftState, ErrorState, SelectedMessage, Session};

pub const NO_UNREAD_MESSAGE: &str = "no unread messages";

/// What an action did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action completed and the controller moved to this phase.
    Advanced(WorkflowPhase),
    /// The action failed; the error state is set and this is the phase the
    /// controller reverted to.
    Failed(WorkflowPhase),
    /// Not valid right now. Nothing changed.
    Ignored,
    /// A response for a request that is no longer current. Nothing changed.
    Stale,
}

/// Handle for one issued request, carrying what must be sent to the service.
#[derive(Debug)]
pub struct Ticket<R> {
    token: OperationToken,
    request: R,
}

impl<R> Ticket<R> {
    pub fn token(&self) -> OperationToken {
        self.token
    }

    pub fn request(&self) -> &R {
        &self.request
    }
}

#[derive(Debug, Clone)]
enum Pending {
    FetchList,
    LoadContent { id: String },
    Generate,
    Send,
}

impl Pending {
    fn kind(&self) -> OperationKind {
        match self {
            Pending::FetchList => OperationKind::FetchList,
            Pending::LoadContent { .. } => OperationKind::LoadContent,
            Pending::Generate => OperationKind::Generate,
            Pending::Send => OperationKind::Send,
        }
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    token: OperationToken,
    pending: Pending,
}

#[derive(Debug, Default)]
pub struct WorkflowController {
    phase: WorkflowPhase,
    session: Session,
    error: Option<ErrorState>,
    in_flight: Option<InFlight>,
    issued: u64,
    calendar_notes: String,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes seeded into the draft of every selected message.
    pub fn with_calendar_notes(mut self, notes: impl Into<String>) -> Self {
        self.calendar_notes = notes.into();
        self
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn flags(&self) -> OperationFlags {
        OperationFlags::for_operation(self.in_flight.as_ref().map(|op| op.pending.kind()))
    }

    pub fn summaries(&self) -> &[MessageSummary] {
        &self.session.summaries
    }

    pub fn selected(&self) -> Option<&SelectedMessage> {
        self.session.selected.as_ref()
    }

    pub fn draft(&self) -> &DraftState {
        &self.session.draft
    }

    pub fn error(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    pub fn in_flight(&self) -> Option<OperationToken> {
        self.in_flight.as_ref().map(|op| op.token)
    }

    pub fn can_request_list(&self) -> bool {
        self.in_flight.is_none() && (self.phase == WorkflowPhase::Idle || self.error.is_some())
    }

    pub fn can_select(&self, id: &str) -> bool {
        self.can_select_any() && self.session.contains(id)
    }

    pub fn can_select_any(&self) -> bool {
        self.in_flight.is_none() && self.phase == WorkflowPhase::ListReady
    }

    pub fn can_generate(&self) -> bool {
        self.in_flight.is_none()
            && matches!(
                self.phase,
                WorkflowPhase::Composing | WorkflowPhase::ReplyReady
            )
    }

    pub fn can_send(&self) -> bool {
        self.in_flight.is_none() && self.phase == WorkflowPhase::ReplyReady
    }

    pub fn can_edit_draft(&self) -> bool {
        self.can_generate()
    }

    pub fn begin_request_list(&mut self) -> Result<Ticket<()>, Outcome> {
        if !self.can_request_list() {
            return Err(self.ignore(OperationKind::FetchList));
        }

        self.session = Session::default();
        self.error = None;
        let token = self.start(Pending::FetchList, WorkflowPhase::ListLoading);
        Ok(Ticket { token, request: () })
    }

    pub fn finish_request_list(
        &mut self,
        token: OperationToken,
        result: AppResult<Vec<MessageSummary>>,
    ) -> Outcome {
        if self.settle(token, OperationKind::FetchList).is_none() {
            return Outcome::Stale;
        }

        match result {
            Ok(summaries) if !summaries.is_empty() => {
                tracing::info!(count = summaries.len(), "unread messages listed");
                self.session.summaries = summaries;
                self.advance(WorkflowPhase::ListReady)
            }
            Ok(_) => self.fail(
                WorkflowPhase::Idle,
                AppError::EmptyResult(NO_UNREAD_MESSAGE.to_string()),
            ),
            Err(err) => self.fail(WorkflowPhase::Idle, err),
        }
    }

    pub fn begin_select(&mut self, id: &str) -> Result<Ticket<String>, Outcome> {
        if !self.can_select(id) {
            if self.can_select_any() {
                tracing::warn!(id, "selected id is not in the unread list");
            }
            return Err(self.ignore(OperationKind::LoadContent));
        }

        self.error = None;
        let pending = Pending::LoadContent { id: id.to_string() };
        let token = self.start(pending, WorkflowPhase::ContentLoading);
        Ok(Ticket {
            token,
            request: id.to_string(),
        })
    }

    pub fn finish_select(
        &mut self,
        token: OperationToken,
        result: AppResult<MessageContent>,
    ) -> Outcome {
        let Some(Pending::LoadContent { id }) = self.settle(token, OperationKind::LoadContent) else {
            return Outcome::Stale;
        };

        match result {
            Ok(content) => {
                let selected = SelectedMessage::from_content(id, content);
                tracing::info!(id = %selected.id, "message loaded and marked read");
                self.session.draft = DraftState::seeded(&selected.body, &self.calendar_notes);
                self.session.summaries.clear();
                self.session.selected = Some(selected);
                self.advance(WorkflowPhase::Composing)
            }
            Err(err) => self.fail(WorkflowPhase::ListReady, err),
        }
    }

    pub fn edit_email_body(&mut self, text: impl Into<String>) -> bool {
        if !self.can_edit_draft() {
            return false;
        }
        self.session.draft.email_body = text.into();
        true
    }

    pub fn edit_calendar_notes(&mut self, text: impl Into<String>) -> bool {
        if !self.can_edit_draft() {
            return false;
        }
        self.session.draft.calendar_notes = text.into();
        true
    }

    pub fn begin_generate(
        &mut self,
        email_body: impl Into<String>,
        calendar_notes: impl Into<String>,
    ) -> Result<Ticket<DraftRequest>, Outcome> {
        if !self.can_generate() {
            return Err(self.ignore(OperationKind::Generate));
        }

        self.error = None;
        let draft = &mut self.session.draft;
        draft.email_body = email_body.into();
        draft.calendar_notes = calendar_notes.into();

        if draft.email_body.trim().is_empty() {
            let phase = self.phase;
            return Err(self.fail(
                phase,
                AppError::Precondition("email content is required to draft a reply".to_string()),
            ));
        }

        draft.generated_reply.clear();
        let request = DraftRequest {
            email_body: draft.email_body.clone(),
            calendar_notes: draft.calendar_notes.clone(),
        };
        let token = self.start(Pending::Generate, WorkflowPhase::Generating);
        Ok(Ticket { token, request })
    }

    pub fn finish_generate(&mut self, token: OperationToken, result: AppResult<String>) -> Outcome {
        if self.settle(token, OperationKind::Generate).is_none() {
            return Outcome::Stale;
        }

        match result {
            Ok(reply) if !reply.trim().is_empty() => {
                self.session.draft.generated_reply = reply;
                self.advance(WorkflowPhase::ReplyReady)
            }
            Ok(_) => self.fail(
                WorkflowPhase::Composing,
                AppError::Service("drafting service returned an empty reply".to_string()),
            ),
            Err(err) => self.fail(WorkflowPhase::Composing, err),
        }
    }

    pub fn begin_send(&mut self) -> Result<Ticket<SendRequest>, Outcome> {
        if !self.can_send() {
            return Err(self.ignore(OperationKind::Send));
        }

        self.error = None;
        let request = match self.reply_request() {
            Ok(request) => request,
            Err(err) => return Err(self.fail(WorkflowPhase::ReplyReady, err)),
        };

        let token = self.start(Pending::Send, WorkflowPhase::Sending);
        Ok(Ticket { token, request })
    }

    pub fn finish_send(&mut self, token: OperationToken, result: AppResult<SendReceipt>) -> Outcome {
        if self.settle(token, OperationKind::Send).is_none() {
            return Outcome::Stale;
        }

        match result {
            Ok(receipt) => {
                tracing::info!(message_id = ?receipt.message_id, "reply sent");
                self.session = Session::default();
                self.advance(WorkflowPhase::Idle)
            }
            Err(err) => self.fail(WorkflowPhase::ReplyReady, err),
        }
    }

    /// Drops the whole session, including any request still in flight. A
    /// response to that request will come back as [`Outcome::Stale`].
    pub fn abandon_session(&mut self) -> Outcome {
        if let Some(op) = self.in_flight.take() {
            tracing::info!(
                token = op.token.value(),
                operation = op.pending.kind().name(),
                "abandoning in-flight request"
            );
        }

        self.session = Session::default();
        self.error = None;
        self.advance(WorkflowPhase::Idle)
    }

    pub async fn request_unread_list<S: MailService + ?Sized>(&mut self, service: &S) -> Outcome {
        let ticket = match self.begin_request_list() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let result = service.list_unread().await;
        self.finish_request_list(ticket.token, result)
    }

    pub async fn select_message<S: MailService + ?Sized>(
        &mut self,
        service: &S,
        id: &str,
    ) -> Outcome {
        let ticket = match self.begin_select(id) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let result = service.fetch_content_and_mark_read(&ticket.request).await;
        self.finish_select(ticket.token, result)
    }

    pub async fn generate_reply<S: MailService + ?Sized>(
        &mut self,
        service: &S,
        email_body: impl Into<String>,
        calendar_notes: impl Into<String>,
    ) -> Outcome {
        let ticket = match self.begin_generate(email_body, calendar_notes) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let result = service.draft_reply(&ticket.request).await;
        self.finish_generate(ticket.token, result)
    }

    pub async fn send_reply<S: MailService + ?Sized>(&mut self, service: &S) -> Outcome {
        let ticket = match self.begin_send() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let result = service.send(&ticket.request).await;
        self.finish_send(ticket.token, result)
    }

    fn reply_request(&self) -> AppResult<SendRequest> {
        let reply = &self.session.draft.generated_reply;
        let selected = self.session.selected.as_ref();
        let address = selected
            .map(|message| message.sender_address.trim())
            .filter(|address| !address.is_empty());
        let subject = selected.and_then(|message| message.subject.as_deref());

        let mut missing = Vec::new();
        if reply.trim().is_empty() {
            missing.push("generated reply");
        }
        if address.is_none() {
            missing.push("sender address");
        }
        if subject.is_none() {
            missing.push("subject");
        }

        match (address, subject) {
            (Some(address), Some(subject)) if missing.is_empty() => Ok(SendRequest {
                to: address.to_string(),
                subject: format!("Re: {subject}"),
                body: reply.clone(),
            }),
            _ => Err(AppError::Precondition(format!(
                "cannot send reply: missing {}",
                missing.join(", ")
            ))),
        }
    }

    fn start(&mut self, pending: Pending, phase: WorkflowPhase) -> OperationToken {
        self.issued += 1;
        let token = OperationToken(self.issued);
        tracing::debug!(
            token = token.value(),
            operation = pending.kind().name(),
            "request issued"
        );
        self.in_flight = Some(InFlight { token, pending });
        self.phase = phase;
        token
    }

    /// Releases the in-flight slot if `token` still owns it.
    fn settle(&mut self, token: OperationToken, kind: OperationKind) -> Option<Pending> {
        match self.in_flight.take() {
            Some(op) if op.token == token && op.pending.kind() == kind => Some(op.pending),
            current => {
                tracing::warn!(
                    token = token.value(),
                    current = ?current.as_ref().map(|op| op.token.value()),
                    "discarding stale response"
                );
                self.in_flight = current;
                None
            }
        }
    }

    fn ignore(&self, kind: OperationKind) -> Outcome {
        tracing::debug!(
            operation = kind.name(),
            phase = self.phase.label(),
            busy = self.in_flight.is_some(),
            "action not valid now; ignoring"
        );
        Outcome::Ignored
    }

    fn advance(&mut self, phase: WorkflowPhase) -> Outcome {
        self.phase = phase;
        Outcome::Advanced(phase)
    }

    fn fail(&mut self, phase: WorkflowPhase, err: AppError) -> Outcome {
        tracing::warn!(error = %err, phase = phase.label(), "workflow action failed");
        self.error = Some(ErrorState::from_error(&err));
        self.phase = phase;
        Outcome::Failed(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> MessageSummary {
        MessageSummary {
            id: id.to_string(),
            sender: "A".to_string(),
            subject: "Hi".to_string(),
            snippet: "...".to_string(),
        }
    }

    fn content(subject: Option<&str>, sender_full: &str) -> MessageContent {
        MessageContent {
            sender_name: "A".to_string(),
            sender_full: sender_full.to_string(),
            subject: subject.map(ToOwned::to_owned),
            body: "Can we meet?".to_string(),
        }
    }

    fn composing(subject: Option<&str>, sender_full: &str) -> WorkflowController {
        let mut controller = WorkflowController::new();
        let ticket = controller.begin_request_list().expect("list");
        controller.finish_request_list(ticket.token(), Ok(vec![summary("1")]));
        let ticket = controller.begin_select("1").expect("select");
        controller.finish_select(ticket.token(), Ok(content(subject, sender_full)));
        controller
    }

    #[test]
    fn stale_token_leaves_in_flight_request_alone() {
        let mut controller = WorkflowController::new();
        let first = controller.begin_request_list().expect("list");
        controller.abandon_session();
        let second = controller.begin_request_list().expect("list again");

        let outcome = controller.finish_request_list(first.token(), Ok(vec![summary("old")]));
        assert_eq!(outcome, Outcome::Stale);
        assert_eq!(controller.in_flight(), Some(second.token()));
        assert!(controller.flags().is_fetching_list);
        assert_eq!(controller.phase(), WorkflowPhase::ListLoading);
    }

    #[test]
    fn empty_body_is_rejected_before_drafting() {
        let mut controller = composing(Some("Hi"), "a@x.com");
        let outcome = controller.begin_generate("   ", "busy monday").unwrap_err();

        assert_eq!(outcome, Outcome::Failed(WorkflowPhase::Composing));
        assert!(controller.in_flight().is_none());
        assert_eq!(controller.draft().calendar_notes, "busy monday");
        assert!(controller.error().is_some());
    }

    #[test]
    fn send_precondition_names_every_missing_field() {
        let mut controller = composing(None, "  ");
        let ticket = controller.begin_generate("body", "").expect("generate");
        controller.finish_generate(ticket.token(), Ok("Sure.".to_string()));

        let outcome = controller.begin_send().unwrap_err();
        assert_eq!(outcome, Outcome::Failed(WorkflowPhase::ReplyReady));
        let message = &controller.error().expect("error").message;
        assert!(message.contains("sender address"));
        assert!(message.contains("subject"));
        assert!(!message.contains("generated reply"));
    }

    #[test]
    fn empty_subject_is_still_sendable() {
        let mut controller = composing(Some(""), "a@x.com");
        let ticket = controller.begin_generate("body", "").expect("generate");
        controller.finish_generate(ticket.token(), Ok("Sure.".to_string()));

        let ticket = controller.begin_send().expect("send");
        assert_eq!(ticket.request().subject, "Re: ");
        assert_eq!(ticket.request().to, "a@x.com");
    }

    #[test]
    fn calendar_notes_are_seeded_on_selection() {
        let mut controller = WorkflowController::new().with_calendar_notes("out friday");
        let ticket = controller.begin_request_list().expect("list");
        controller.finish_request_list(ticket.token(), Ok(vec![summary("1")]));
        let ticket = controller.begin_select("1").expect("select");
        controller.finish_select(ticket.token(), Ok(content(Some("Hi"), "a@x.com")));

        assert_eq!(controller.draft().calendar_notes, "out friday");
        assert_eq!(controller.draft().email_body, "Can we meet?");
    }
}

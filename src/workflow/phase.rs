use serde::Serialize;

/// Stage of the triage session. Loading phases only exist while a request
/// is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    #[default]
    Idle,
    ListLoading,
    ListReady,
    ContentLoading,
    Composing,
    Generating,
    ReplyReady,
    Sending,
}

impl WorkflowPhase {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "idle",
            WorkflowPhase::ListLoading => "list loading",
            WorkflowPhase::ListReady => "list ready",
            WorkflowPhase::ContentLoading => "content loading",
            WorkflowPhase::Composing => "composing",
            WorkflowPhase::Generating => "generating",
            WorkflowPhase::ReplyReady => "reply ready",
            WorkflowPhase::Sending => "sending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    FetchList,
    LoadContent,
    Generate,
    Send,
}

impl OperationKind {
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::FetchList => "fetch_list",
            OperationKind::LoadContent => "load_content",
            OperationKind::Generate => "generate",
            OperationKind::Send => "send",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationFlags {
    pub is_fetching_list: bool,
    pub is_loading_content: bool,
    pub is_generating: bool,
    pub is_sending: bool,
}

impl OperationFlags {
    /// Flags are derived from the single in-flight operation, so at most one
    /// of them can ever be set.
    pub fn for_operation(kind: Option<OperationKind>) -> Self {
        Self {
            is_fetching_list: kind == Some(OperationKind::FetchList),
            is_loading_content: kind == Some(OperationKind::LoadContent),
            is_generating: kind == Some(OperationKind::Generate),
            is_sending: kind == Some(OperationKind::Send),
        }
    }

    pub fn active_count(&self) -> usize {
        [
            self.is_fetching_list,
            self.is_loading_content,
            self.is_generating,
            self.is_sending,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count()
    }

    pub fn any(&self) -> bool {
        self.active_count() > 0
    }
}

/// Identifies one issued request. Tokens are never reused within a
/// controller, so a response carrying an old token is recognisably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationToken(pub(crate) u64);

impl OperationToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

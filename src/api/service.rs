use async_trait::async_trait;

use crate::error::AppResult;

use super::models::{DraftRequest, MessageContent, MessageSummary, SendReceipt, SendRequest};

/// The backend the workflow talks to for every side effect.
#[async_trait]
pub trait MailService: Send + Sync {
    /// An empty `Vec` means the listing succeeded with nothing unread.
    async fn list_unread(&self) -> AppResult<Vec<MessageSummary>>;

    async fn fetch_content_and_mark_read(&self, id: &str) -> AppResult<MessageContent>;

    /// Returns the drafted reply text.
    async fn draft_reply(&self, request: &DraftRequest) -> AppResult<String>;

    async fn send(&self, request: &SendRequest) -> AppResult<SendReceipt>;
}

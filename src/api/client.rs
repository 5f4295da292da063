use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, AppResult};

use super::models::{DraftRequest, MessageContent, MessageSummary, SendReceipt, SendRequest};
use super::routes;
use super::service::MailService;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const NO_UNREAD_FALLBACK: &str = "No unread emails found.";
const CONTENT_FALLBACK: &str = "Could not load email content.";
const SEND_FALLBACK: &str = "Failed to send email.";

/// Field carrying the human readable error in a failure body.
#[derive(Debug, Clone, Copy)]
enum ErrorField {
    Message,
    Error,
}

impl ErrorField {
    fn key(self) -> &'static str {
        match self {
            ErrorField::Message => "message",
            ErrorField::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailServiceClient {
    http: Client,
    base_url: String,
}

impl MailServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        error_field: ErrorField,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        self.parse_json_response(response, error_field).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        error_field: ErrorField,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        self.parse_json_response(response, error_field).await
    }

    fn endpoint_url(&self, endpoint: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(endpoint.trim_start_matches('/'));
        Ok(url)
    }

    async fn parse_json_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        error_field: ErrorField,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await?;
        tracing::trace!(%status, bytes = body.len(), "mail service answered");

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|err| {
                AppError::Transport(format!("malformed response from mail service: {err}"))
            });
        }

        Err(map_api_error(status, &body, error_field))
    }
}

#[async_trait]
impl MailService for MailServiceClient {
    async fn list_unread(&self) -> AppResult<Vec<MessageSummary>> {
        let response: ListUnreadResponse = self
            .get_json(routes::list_unread_endpoint(), ErrorField::Message)
            .await?;
        response.into_summaries()
    }

    async fn fetch_content_and_mark_read(&self, id: &str) -> AppResult<MessageContent> {
        let endpoint = routes::content_endpoint(id);
        let response: ContentResponse = self.get_json(&endpoint, ErrorField::Message).await?;
        response.into_content()
    }

    async fn draft_reply(&self, request: &DraftRequest) -> AppResult<String> {
        let response: DraftResponse = self
            .post_json(routes::draft_endpoint(), request, ErrorField::Error)
            .await?;
        response
            .reply
            .ok_or_else(|| AppError::Service("drafting service returned no reply".to_string()))
    }

    async fn send(&self, request: &SendRequest) -> AppResult<SendReceipt> {
        let response: SendResponse = self
            .post_json(routes::send_endpoint(), request, ErrorField::Message)
            .await?;
        response.into_receipt()
    }
}

#[derive(Debug, Deserialize)]
struct ListUnreadResponse {
    status: Option<String>,
    #[serde(default)]
    emails: Vec<MessageSummary>,
    message: Option<String>,
}

impl ListUnreadResponse {
    fn into_summaries(self) -> AppResult<Vec<MessageSummary>> {
        let message = non_empty(self.message).unwrap_or_else(|| NO_UNREAD_FALLBACK.to_string());

        match self.status.as_deref() {
            Some("success") => Ok(self.emails),
            Some("no_email") => Err(AppError::EmptyResult(message)),
            _ => Err(AppError::Service(message)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    status: Option<String>,
    body: Option<String>,
    sender_name: Option<String>,
    sender_full: Option<String>,
    subject: Option<String>,
    message: Option<String>,
}

impl ContentResponse {
    fn into_content(self) -> AppResult<MessageContent> {
        if self.status.as_deref() != Some("success") {
            let message = non_empty(self.message).unwrap_or_else(|| CONTENT_FALLBACK.to_string());
            return Err(AppError::Service(message));
        }

        Ok(MessageContent {
            sender_name: self.sender_name.unwrap_or_default(),
            sender_full: self.sender_full.unwrap_or_default(),
            subject: self.subject,
            body: self.body.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    reply: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    status: Option<String>,
    message: Option<String>,
    message_id: Option<String>,
}

impl SendResponse {
    fn into_receipt(self) -> AppResult<SendReceipt> {
        if self.status.as_deref() == Some("success") {
            return Ok(SendReceipt {
                message_id: self.message_id,
            });
        }

        let message = non_empty(self.message).unwrap_or_else(|| SEND_FALLBACK.to_string());
        Err(AppError::Service(message))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn map_api_error(status: StatusCode, body: &str, error_field: ErrorField) -> AppError {
    match parse_api_error_message(body, error_field) {
        Some(message) => AppError::Service(message),
        None => AppError::Transport(format!("mail service request failed ({status})")),
    }
}

fn parse_api_error_message(body: &str, error_field: ErrorField) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let message = value.get(error_field.key())?.as_str()?;
    non_empty(Some(message.to_string()))
}

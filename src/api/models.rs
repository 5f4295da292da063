use serde::{Deserialize, Deserializer, Serialize};

/// One row of the unread listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub sender: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,
}

/// The listing sends `null` for headers Gmail did not return.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Full content of a message, returned once it has been marked read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContent {
    pub sender_name: String,
    pub sender_full: String,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftRequest {
    #[serde(rename = "email_content")]
    pub email_body: String,
    #[serde(rename = "calendar_info")]
    pub calendar_notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}

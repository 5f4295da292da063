pub fn list_unread_endpoint() -> &'static str {
    "/fetch-email"
}

pub fn content_endpoint(id: &str) -> String {
    format!("/get-email-content/{id}")
}

pub fn draft_endpoint() -> &'static str {
    "/generate-reply"
}

pub fn send_endpoint() -> &'static str {
    "/send-reply"
}

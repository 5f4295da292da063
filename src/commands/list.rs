use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::OutputMode;
use crate::workflow::{self, ErrorKind, ErrorState, Outcome};

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let mut controller = ctx.controller();
    let outcome = controller.request_unread_list(&ctx.mail_client).await;

    if let (Outcome::Failed(_), Some(error)) = (outcome, controller.error()) {
        return match empty_notice(error) {
            Some(notice) => ctx.output.emit(notice, &Vec::<()>::new()),
            None => Err(error.to_error()),
        };
    }

    let view = workflow::project(&controller);
    if ctx.output.mode() == OutputMode::Text {
        for (index, row) in view.unread.iter().enumerate() {
            println!("{}. {}", row.position, row.id);
            println!("   from: {}", row.sender);
            println!("   subject: {}", row.subject);
            println!();
            println!("   {}", row.preview);

            if index + 1 < view.unread.len() {
                println!();
            }
        }

        return Ok(());
    }

    let text = format!("{} unread messages", view.unread.len());
    ctx.output.emit(&text, &controller.summaries())
}

/// An empty inbox is not a failure of the command; the server's wording is kept.
fn empty_notice(error: &ErrorState) -> Option<&str> {
    (error.kind == ErrorKind::EmptyResult).then_some(error.message.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inbox_reports_server_message() {
        let error = ErrorState {
            kind: ErrorKind::EmptyResult,
            message: "No unread emails found or an error occurred during fetch.".to_string(),
        };
        assert_eq!(
            empty_notice(&error),
            Some("No unread emails found or an error occurred during fetch.")
        );
    }

    #[test]
    fn service_failure_is_not_an_empty_inbox() {
        let error = ErrorState {
            kind: ErrorKind::Service,
            message: "Gmail service not available.".to_string(),
        };
        assert_eq!(empty_notice(&error), None);
    }
}

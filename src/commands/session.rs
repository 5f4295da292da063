use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::MailService;
use crate::api::models::MessageSummary;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::output::OutputMode;
use crate::output::text;
use crate::workflow::{self, Outcome, WorkflowController};

const HELP: &str = "\
commands:
  fetch            list unread messages (starts a new session)
  open <n|id>      load a listed message and mark it read
  body <file>      replace the email text used for drafting
  notes <text>     set calendar notes for the draft
  generate         draft a reply
  send             send the drafted reply
  show             print the current state
  reset            abandon the session
  help             show this help
  quit             leave
ctrl-c while a request is pending abandons the session.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Fetch,
    Open(String),
    Body(PathBuf),
    Notes(String),
    Generate,
    Send,
    Show,
    Reset,
    Help,
    Quit,
}

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let mut controller = ctx.controller();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interactive = ctx.output.mode() == OutputMode::Text;

    if interactive {
        text::print_line("type `help` for commands")?;
    }
    ctx.output.view(&workflow::project(&controller))?;

    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => {
                text::print_line(HELP)?;
                continue;
            }
            SessionCommand::Show => {}
            command => match execute(&mut controller, &ctx.mail_client, command).await {
                Ok(Outcome::Ignored) => eprintln!("not available right now"),
                Ok(_) => {}
                Err(err) => eprintln!("error: {err}"),
            },
        }

        ctx.output.view(&workflow::project(&controller))?;
    }

    Ok(())
}

pub fn parse_command(line: &str) -> AppResult<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "fetch" | "list" => SessionCommand::Fetch,
        "open" | "select" => SessionCommand::Open(required(name, rest)?.to_string()),
        "body" => SessionCommand::Body(PathBuf::from(required(name, rest)?)),
        "notes" => SessionCommand::Notes(rest.to_string()),
        "generate" | "draft" => SessionCommand::Generate,
        "send" => SessionCommand::Send,
        "show" => SessionCommand::Show,
        "reset" => SessionCommand::Reset,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => {
            return Err(AppError::InvalidInput(format!(
                "unknown command `{other}`; type `help`"
            )));
        }
    };

    Ok(Some(command))
}

/// Accepts either a 1-based position in the listing or a message id.
pub fn resolve_selection(arg: &str, summaries: &[MessageSummary]) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| summaries.get(index))
        .map(|summary| summary.id.clone())
        .unwrap_or_else(|| arg.to_string())
}

async fn execute<S: MailService + ?Sized>(
    controller: &mut WorkflowController,
    service: &S,
    command: SessionCommand,
) -> AppResult<Outcome> {
    let outcome = match command {
        SessionCommand::Fetch => match controller.begin_request_list() {
            Ok(ticket) => match interruptible(service.list_unread()).await {
                Some(result) => controller.finish_request_list(ticket.token(), result),
                None => controller.abandon_session(),
            },
            Err(outcome) => outcome,
        },
        SessionCommand::Open(arg) => {
            let id = resolve_selection(&arg, controller.summaries());
            match controller.begin_select(&id) {
                Ok(ticket) => {
                    match interruptible(service.fetch_content_and_mark_read(ticket.request())).await
                    {
                        Some(result) => controller.finish_select(ticket.token(), result),
                        None => controller.abandon_session(),
                    }
                }
                Err(outcome) => outcome,
            }
        }
        SessionCommand::Body(path) => {
            let body = fs::read_to_string(&path)?;
            edited(controller, |controller| controller.edit_email_body(body))
        }
        SessionCommand::Notes(notes) => {
            edited(controller, |controller| controller.edit_calendar_notes(notes))
        }
        SessionCommand::Generate => {
            let draft = controller.draft().clone();
            match controller.begin_generate(draft.email_body, draft.calendar_notes) {
                Ok(ticket) => match interruptible(service.draft_reply(ticket.request())).await {
                    Some(result) => controller.finish_generate(ticket.token(), result),
                    None => controller.abandon_session(),
                },
                Err(outcome) => outcome,
            }
        }
        SessionCommand::Send => match controller.begin_send() {
            Ok(ticket) => match interruptible(service.send(ticket.request())).await {
                Some(result) => controller.finish_send(ticket.token(), result),
                None => controller.abandon_session(),
            },
            Err(outcome) => outcome,
        },
        SessionCommand::Reset => controller.abandon_session(),
        SessionCommand::Show | SessionCommand::Help | SessionCommand::Quit => Outcome::Ignored,
    };

    Ok(outcome)
}

fn edited(
    controller: &mut WorkflowController,
    edit: impl FnOnce(&mut WorkflowController) -> bool,
) -> Outcome {
    if edit(controller) {
        Outcome::Advanced(controller.phase())
    } else {
        Outcome::Ignored
    }
}

/// `None` when the user hit ctrl-c before the service answered.
async fn interruptible<T>(call: impl Future<Output = AppResult<T>>) -> Option<AppResult<T>> {
    tokio::select! {
        result = call => Some(result),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("request interrupted by user");
            None
        }
    }
}

fn required<'a>(name: &str, rest: &'a str) -> AppResult<&'a str> {
    if rest.is_empty() {
        return Err(AppError::InvalidInput(format!("`{name}` needs an argument")));
    }
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Vec<MessageSummary> {
        ["18c2", "18c3"]
            .into_iter()
            .map(|id| MessageSummary {
                id: id.to_string(),
                sender: "A".to_string(),
                subject: String::new(),
                snippet: String::new(),
            })
            .collect()
    }

    #[test]
    fn parses_open_with_argument() {
        assert_eq!(
            parse_command("open 2").expect("parse"),
            Some(SessionCommand::Open("2".to_string()))
        );
    }

    #[test]
    fn notes_keep_inner_spacing() {
        assert_eq!(
            parse_command("notes  busy tue,  free wed ").expect("parse"),
            Some(SessionCommand::Notes("busy tue,  free wed".to_string()))
        );
    }

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(parse_command("   ").expect("parse"), None);
    }

    #[test]
    fn open_without_target_is_invalid() {
        assert!(matches!(
            parse_command("open"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(parse_command("delete 3").is_err());
    }

    #[test]
    fn resolves_position_then_falls_back_to_id() {
        let summaries = summaries();
        assert_eq!(resolve_selection("2", &summaries), "18c3");
        assert_eq!(resolve_selection("18c2", &summaries), "18c2");
        assert_eq!(resolve_selection("0", &summaries), "0");
        assert_eq!(resolve_selection("9", &summaries), "9");
    }
}

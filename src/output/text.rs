use std::fmt::Write;

use crate::error::AppResult;
use crate::workflow::WorkflowView;

pub fn print_line(line: &str) -> AppResult<()> {
    println!("{line}");
    Ok(())
}

pub fn render_view(view: &WorkflowView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", view.phase.label());

    if let Some(busy) = view.busy {
        let _ = writeln!(out, "{busy}");
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }

    for row in &view.unread {
        let _ = writeln!(out, "{}. {}", row.position, row.id);
        let _ = writeln!(out, "   from: {}", row.sender);
        let _ = writeln!(out, "   subject: {}", row.subject);
        let _ = writeln!(out, "   {}", row.preview);
    }

    if let Some(composer) = &view.composer {
        let _ = writeln!(out, "from: {}", composer.sender_address);
        let _ = writeln!(out, "subject: {}", composer.subject);
        let _ = writeln!(out, "--- email ---");
        let _ = writeln!(out, "{}", composer.email_body.trim_end());
        if !composer.calendar_notes.is_empty() {
            let _ = writeln!(out, "--- calendar notes ---");
            let _ = writeln!(out, "{}", composer.calendar_notes.trim_end());
        }
    }

    if let Some(reply) = &view.reply {
        let _ = writeln!(out, "--- generated reply ---");
        let _ = writeln!(out, "{}", reply.trim_end());
    }

    let actions = [
        (view.affordances.can_fetch, "fetch"),
        (view.affordances.can_select, "open <n>"),
        (view.affordances.can_generate, "generate"),
        (view.affordances.can_send, "send"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect::<Vec<_>>();
    if !actions.is_empty() {
        let _ = write!(out, "next: {}", actions.join(", "));
    }

    out.trim_end().to_string()
}

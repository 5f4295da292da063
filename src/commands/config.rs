use serde::Serialize;

use crate::cli::{ConfigCommand, ConfigSetArgs};
use crate::config::{self, Settings};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct ConfigReport<'a> {
    profile: &'a str,
    path: String,
    base_url: &'a str,
    request_timeout_secs: u64,
    calendar_notes: &'a str,
}

pub fn run(ctx: &AppContext, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => show(ctx, &ctx.settings),
        ConfigCommand::Set(args) => {
            let updated = apply(ctx.settings.clone(), args)?;
            config::save_settings(&ctx.paths, &ctx.profile, &updated)?;
            tracing::info!(profile = %ctx.profile, "settings saved");
            show(ctx, &updated)
        }
    }
}

fn show(ctx: &AppContext, settings: &Settings) -> AppResult<()> {
    let base_url = settings.base_url();
    let report = ConfigReport {
        profile: &ctx.profile,
        path: ctx.paths.settings_file(&ctx.profile).display().to_string(),
        base_url: &base_url,
        request_timeout_secs: settings.request_timeout()?.as_secs(),
        calendar_notes: settings.calendar_notes(),
    };

    let text = format!(
        "profile: {}\nfile: {}\nbase url: {}\ntimeout: {}s\ncalendar notes: {}",
        report.profile,
        report.path,
        report.base_url,
        report.request_timeout_secs,
        if report.calendar_notes.is_empty() {
            "(none)"
        } else {
            report.calendar_notes
        }
    );
    ctx.output.emit(&text, &report)
}

fn apply(mut settings: Settings, args: ConfigSetArgs) -> AppResult<Settings> {
    if let Some(url) = args.url {
        url::Url::parse(&url)?;
        settings.base_url = Some(url);
    }

    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            return Err(AppError::InvalidInput(
                "--timeout-secs must be greater than 0".to_string(),
            ));
        }
        settings.request_timeout_secs = Some(secs);
    }

    if let Some(notes) = args.calendar_notes {
        settings.calendar_notes = Some(notes).filter(|notes| !notes.trim().is_empty());
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ConfigSetArgs {
        ConfigSetArgs {
            url: None,
            timeout_secs: None,
            calendar_notes: None,
        }
    }

    #[test]
    fn rejects_unparseable_url() {
        let result = apply(
            Settings::default(),
            ConfigSetArgs {
                url: Some("not a url".to_string()),
                ..args()
            },
        );
        assert!(matches!(result, Err(AppError::Url(_))));
    }

    #[test]
    fn blank_notes_clear_the_default() {
        let settings = Settings {
            calendar_notes: Some("busy".to_string()),
            ..Settings::default()
        };
        let updated = apply(
            settings,
            ConfigSetArgs {
                calendar_notes: Some(" ".to_string()),
                ..args()
            },
        )
        .expect("apply");
        assert_eq!(updated.calendar_notes, None);
    }

    #[test]
    fn keeps_fields_that_were_not_passed() {
        let settings = Settings {
            base_url: Some("http://mail.lan:5000".to_string()),
            ..Settings::default()
        };
        let updated = apply(
            settings,
            ConfigSetArgs {
                timeout_secs: Some(30),
                ..args()
            },
        )
        .expect("apply");
        assert_eq!(updated.base_url.as_deref(), Some("http://mail.lan:5000"));
        assert_eq!(updated.request_timeout_secs, Some(30));
    }
}

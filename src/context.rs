use crate::api::MailServiceClient;
use crate::config::{self, AppPaths, Settings};
use crate::error::AppResult;
use crate::output::Output;
use crate::workflow::WorkflowController;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub mail_client: MailServiceClient,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, base_url: Option<String>, json: bool) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile)?;
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        let base_url = base_url.unwrap_or_else(|| settings.base_url());
        let mail_client = MailServiceClient::new(base_url, settings.request_timeout()?)?;
        let output = Output::new(json);

        tracing::debug!(%profile, base_url = mail_client.base_url(), "context ready");

        Ok(Self {
            profile,
            paths,
            settings,
            mail_client,
            output,
        })
    }

    /// A fresh controller for one triage session.
    pub fn controller(&self) -> WorkflowController {
        WorkflowController::new().with_calendar_notes(self.settings.calendar_notes())
    }
}

use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        base_url,
        json,
        verbose: _,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, base_url, json)?;

    match command {
        Command::List => commands::list::run(&ctx).await,
        Command::Session => commands::session::run(&ctx).await,
        Command::Config(args) => commands::config::run(&ctx, args.command),
    }
}

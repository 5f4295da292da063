use clap::Parser;
use responder::cli::{Cli, Command, ConfigCommand};

#[test]
fn parses_session() {
    let cli = Cli::try_parse_from(["responder", "session"]).expect("cli parse should work");
    assert!(matches!(cli.command, Command::Session));
    assert_eq!(cli.profile, "default");
    assert_eq!(cli.base_url, None);
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "responder",
        "list",
        "--base-url",
        "http://10.0.0.2:5000",
        "--json",
        "-vv",
    ])
    .expect("cli parse should work");
    assert!(matches!(cli.command, Command::List));
    assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:5000"));
    assert!(cli.json);
    assert_eq!(cli.verbose, 2);
}

#[test]
fn parses_config_set() {
    let cli = Cli::try_parse_from([
        "responder",
        "--profile",
        "work",
        "config",
        "set",
        "--url",
        "http://mail.lan:5000",
        "--timeout-secs",
        "30",
        "--calendar-notes",
        "out on friday",
    ])
    .expect("cli parse should work");
    assert_eq!(cli.profile, "work");
    match cli.command {
        Command::Config(config) => match config.command {
            ConfigCommand::Set(set) => {
                assert_eq!(set.url.as_deref(), Some("http://mail.lan:5000"));
                assert_eq!(set.timeout_secs, Some(30));
                assert_eq!(set.calendar_notes.as_deref(), Some("out on friday"));
            }
            ConfigCommand::Show => panic!("expected config set"),
        },
        _ => panic!("expected config command"),
    }
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["responder", "auth", "login"]).is_err());
}

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `convene` binary.
#[derive(Debug, Parser)]
#[command(name = "convene", version, about = "Convene - community events from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use convene_core::enums::EventType;

    use super::subcommands::{AuthCommands, EventCommands, PrivateEventCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from(["convene", "--format", "raw", "events", "joined", "-v"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Events {
                action: EventCommands::Private(PrivateEventCommands::Joined)
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["convene", "--format", "xml", "auth", "status"]).is_err());
    }

    #[test]
    fn list_parses_type_case_insensitively() {
        let cli = Cli::try_parse_from(["convene", "events", "list", "--type", "health"])
            .expect("cli should parse");
        let Commands::Events {
            action: EventCommands::List(args),
        } = cli.command
        else {
            panic!("expected events list");
        };
        assert_eq!(args.event_type, Some(EventType::Health));
        assert_eq!(args.search, "");
    }

    #[test]
    fn only_list_and_show_parse_as_public_event_commands() {
        let parse = |args: &[&str]| {
            let cli = Cli::try_parse_from(["convene", "events"].iter().chain(args))
                .expect("cli should parse");
            let Commands::Events { action } = cli.command else {
                panic!("expected events command");
            };
            action
        };

        assert!(matches!(parse(&["list"]), EventCommands::List(_)));
        assert!(matches!(parse(&["show", "e1"]), EventCommands::Show(_)));
        for args in [
            &["update", "e1", "--title", "T"][..],
            &["join", "e1"][..],
            &["joined"][..],
            &["mine"][..],
            &["delete", "e1"][..],
        ] {
            assert!(
                matches!(parse(args), EventCommands::Private(_)),
                "{args:?} should be private"
            );
        }
        assert!(matches!(
            parse(&["delete", "e9"]),
            EventCommands::Private(PrivateEventCommands::Delete(ref target)) if target.id == "e9"
        ));
    }

    #[test]
    fn list_rejects_unknown_type() {
        assert!(Cli::try_parse_from(["convene", "events", "list", "--type", "sports"]).is_err());
    }

    #[test]
    fn login_requires_credentials_or_google() {
        assert!(Cli::try_parse_from(["convene", "auth", "login"]).is_err());
        assert!(
            Cli::try_parse_from(["convene", "auth", "login", "--google", "--email", "a@b.com"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["convene", "auth", "login", "--google"])
            .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Login(args),
        } = cli.command
        else {
            panic!("expected auth login");
        };
        assert!(args.google);
        assert_eq!(args.email, None);
    }

    #[test]
    fn register_takes_optional_photo() {
        let cli = Cli::try_parse_from([
            "convene",
            "auth",
            "register",
            "--email",
            "a@b.com",
            "--password",
            "Abc123",
            "--name",
            "Ana",
        ])
        .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Register(args),
        } = cli.command
        else {
            panic!("expected auth register");
        };
        assert_eq!(args.name, "Ana");
        assert_eq!(args.photo_url, None);
    }
}

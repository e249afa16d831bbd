mod commands;
mod config;
mod data;
mod layout;
mod tree;
mod tui;

use std::path::Path;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "braid",
    about = "An interactive tree view for threaded discussions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive viewer
    View {
        /// Posts export: a file path or an http(s) URL
        source: Option<String>,
        /// Id of the post to open first
        #[arg(long)]
        post: Option<String>,
        /// Start with depth growing downward instead of rightward
        #[arg(long)]
        vertical: bool,
    },
    /// List the posts in an export
    Posts {
        /// Posts export: a file path or an http(s) URL
        source: Option<String>,
    },
    /// Transform every post and verify the tree invariants
    Check {
        /// Posts export: a file path or an http(s) URL
        source: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load(Path::new("."))?;

    match cli.command {
        Command::View {
            source,
            post,
            vertical,
        } => {
            let source = resolve_source(source, &config)?;
            commands::view::run(source, post, vertical, &config)
        }
        Command::Posts { source } => {
            let source = resolve_source(source, &config)?;
            commands::posts::run(&source)
        }
        Command::Check { source } => {
            let source = resolve_source(source, &config)?;
            commands::check::run(&source)
        }
    }
}

/// The export to load: the CLI argument when given, else the configured
/// default.
fn resolve_source(arg: Option<String>, config: &Config) -> Result<String> {
    match arg.or_else(|| config.source.clone()) {
        Some(source) => Ok(source),
        None => bail!("no data source given (pass SOURCE or set `source` in braid.toml)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_parses_source_and_flags() {
        let cli = Cli::try_parse_from([
            "braid",
            "view",
            "posts.json",
            "--post",
            "t3_abc",
            "--vertical",
        ])
        .expect("view arguments should parse");
        match cli.command {
            Command::View {
                source,
                post,
                vertical,
            } => {
                assert_eq!(source.as_deref(), Some("posts.json"));
                assert_eq!(post.as_deref(), Some("t3_abc"));
                assert!(vertical);
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn source_argument_is_optional() {
        let cli = Cli::try_parse_from(["braid", "posts"]).expect("bare posts should parse");
        match cli.command {
            Command::Posts { source } => assert!(source.is_none()),
            _ => panic!("expected posts command"),
        }
    }

    #[test]
    fn cli_argument_wins_over_config() {
        let config = Config {
            source: Some("configured.json".to_string()),
            ..Config::default()
        };
        let source = resolve_source(Some("cli.json".to_string()), &config).unwrap();
        assert_eq!(source, "cli.json");
    }

    #[test]
    fn config_source_fills_in_when_no_argument() {
        let config = Config {
            source: Some("configured.json".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_source(None, &config).unwrap(), "configured.json");
    }

    #[test]
    fn missing_source_is_an_error() {
        assert!(resolve_source(None, &Config::default()).is_err());
    }
}

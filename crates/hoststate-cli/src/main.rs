//! hoststate CLI
//!
//! Reconciles host configuration documents and file placement from the
//! command line or through the JSON module protocol.

mod cli;
mod commands;
mod error;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    let cli = Cli::parse();
    let machine_output = matches!(cli.command, Commands::Invoke { .. });

    if let Err(e) = run(cli) {
        if machine_output {
            println!("{}", commands::failure_output(&e));
        } else {
            eprintln!("{}: {}", "error".red().bold(), e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    let robustness = cli.robustness();
    match cli.command {
        Commands::Config(args) => commands::run_config(&args, robustness).map(|_| ()),
        Commands::Move(args) => commands::run_move(&args).map(|_| ()),
        Commands::Invoke { module, args_file } => {
            commands::run_invoke(module, args_file.as_deref(), robustness)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "hoststate", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_user() {
        let error = CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_core_error_kind_passthrough() {
        let error = CliError::from(hoststate_core::Error::from(hoststate_fs::Error::Parse {
            path: "/etc/facts.json".into(),
            message: "trailing comma".into(),
        }));
        assert_eq!(error.kind(), "parse");
        assert!(error.to_string().contains("/etc/facts.json"));
    }
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use hoststate_fs::RobustnessConfig;

/// hoststate - Idempotent host configuration and file placement
#[derive(Parser, Debug)]
#[command(name = "hoststate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// How long to wait for the write lock, in milliseconds
    #[arg(
        long,
        global = true,
        env = "HOSTSTATE_LOCK_TIMEOUT_MS",
        default_value_t = 5000
    )]
    pub lock_timeout_ms: u64,

    /// Skip fsync before renaming written files into place
    #[arg(long, global = true, env = "HOSTSTATE_NO_FSYNC")]
    pub no_fsync: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            enable_fsync: !self.no_fsync,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Merge key/value pairs into a JSON configuration file
    ///
    /// Existing values are kept unless --override is given; new keys are
    /// always added.
    ///
    /// Examples:
    ///   hoststate config --file /etc/ansible_local.json --set backup_cron_hour=4
    ///   hoststate config --file /etc/app.json --content-json '{"a":"1"}' --override --diff
    Config(ConfigArgs),

    /// Move a file into place idempotently
    ///
    /// Examples:
    ///   hoststate move --src /originalfile --dest /newfile --validate
    Move(MoveArgs),

    /// Run a module with JSON arguments and print a JSON result
    ///
    /// Arguments are read from ARGS_FILE, or stdin when omitted or "-".
    /// `_ansible_check_mode` and `_ansible_diff` are honored.
    Invoke {
        /// Module to run
        #[arg(value_enum)]
        module: Module,

        /// File holding the JSON argument object
        args_file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `hoststate config`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Absolute path of the JSON configuration file
    #[arg(long)]
    pub file: PathBuf,

    /// Key/value pair to store (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// JSON object of key/value pairs to store
    #[arg(long, value_name = "JSON")]
    pub content_json: Option<String>,

    /// Replace values of keys that already exist
    #[arg(long = "override")]
    pub override_existing: bool,

    /// User owner of the file (only applied together with --group)
    #[arg(long)]
    pub owner: Option<String>,

    /// Group owner of the file (only applied together with --owner)
    #[arg(long)]
    pub group: Option<String>,

    /// File mode, in octal
    #[arg(long, default_value = "0600", value_parser = parse_mode_arg)]
    pub mode: u32,

    /// Mode for created parent directories, in octal
    #[arg(long, default_value = "0700", value_parser = parse_mode_arg)]
    pub dir_mode: u32,

    /// Report what would change without writing
    #[arg(long)]
    pub check: bool,

    /// Show a diff of the document
    #[arg(long)]
    pub diff: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `hoststate move`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MoveArgs {
    /// Absolute path of the source file
    #[arg(long)]
    pub src: PathBuf,

    /// Absolute path of the destination file
    #[arg(long)]
    pub dest: PathBuf,

    /// Compare checksums when both files exist
    #[arg(long)]
    pub validate: bool,

    /// Report what would change without touching files
    #[arg(long)]
    pub check: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

/// Modules reachable through `hoststate invoke`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    /// Host configuration document
    #[value(name = "define_configuration", alias = "config")]
    DefineConfiguration,
    /// File relocation
    #[value(name = "move")]
    Move,
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in '{input}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{input}'")),
    }
}

fn parse_mode_arg(input: &str) -> Result<u32, String> {
    hoststate_core::parse_mode(input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_config_command() {
        let cli = Cli::try_parse_from([
            "hoststate",
            "config",
            "--file",
            "/etc/facts.json",
            "--set",
            "a=1",
            "--set",
            "b=x=y",
            "--override",
            "--mode",
            "0640",
        ])
        .unwrap();

        match cli.command {
            Commands::Config(args) => {
                assert_eq!(args.file, PathBuf::from("/etc/facts.json"));
                assert_eq!(
                    args.set,
                    vec![
                        ("a".to_string(), "1".to_string()),
                        ("b".to_string(), "x=y".to_string())
                    ]
                );
                assert!(args.override_existing);
                assert_eq!(args.mode, 0o640);
                assert_eq!(args.dir_mode, 0o700);
                assert!(!args.check);
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn parse_config_rejects_bad_pair() {
        let result = Cli::try_parse_from([
            "hoststate", "config", "--file", "/etc/f.json", "--set", "novalue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_config_rejects_bad_mode() {
        let result = Cli::try_parse_from([
            "hoststate", "config", "--file", "/etc/f.json", "--mode", "rwx",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_move_command() {
        let cli = Cli::try_parse_from([
            "hoststate", "move", "--src", "/a", "--dest", "/b", "--validate", "--check",
        ])
        .unwrap();

        match cli.command {
            Commands::Move(args) => {
                assert_eq!(args.src, PathBuf::from("/a"));
                assert_eq!(args.dest, PathBuf::from("/b"));
                assert!(args.validate);
                assert!(args.check);
            }
            _ => panic!("Expected Move command"),
        }
    }

    #[test]
    fn parse_invoke_module_names() {
        let cli = Cli::try_parse_from(["hoststate", "invoke", "define_configuration"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Invoke {
                module: Module::DefineConfiguration,
                args_file: None
            }
        );

        let cli = Cli::try_parse_from(["hoststate", "invoke", "move", "args.json"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Invoke {
                module: Module::Move,
                args_file: Some(PathBuf::from("args.json"))
            }
        );
    }

    #[test]
    fn robustness_from_flags() {
        let cli = Cli::try_parse_from([
            "hoststate",
            "--no-fsync",
            "--lock-timeout-ms",
            "250",
            "move",
            "--src",
            "/a",
            "--dest",
            "/b",
        ])
        .unwrap();

        let robustness = cli.robustness();
        assert!(!robustness.enable_fsync);
        assert_eq!(robustness.lock_timeout, Duration::from_millis(250));
    }
}

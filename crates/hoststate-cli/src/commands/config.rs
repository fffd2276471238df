//! Config command implementation
//!
//! Builds a change set from `--content-json` and `--set` pairs and merges
//! it into the target document.

use colored::Colorize;
use hoststate_core::{ConfigReport, ConfigRequest, ConfigStore};
use hoststate_fs::{JsonObject, RobustnessConfig};
use serde_json::Value;

use super::print_status;
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};

/// Assemble the desired change set.
///
/// `--set` pairs are applied after `--content-json`, so they win on
/// conflicting keys.
pub fn build_content(args: &ConfigArgs) -> Result<JsonObject> {
    let mut content = match &args.content_json {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(CliError::invalid_argument(
                    "--content-json must be a JSON object",
                ));
            }
            Err(e) => {
                return Err(CliError::invalid_argument(format!(
                    "--content-json is not valid JSON: {e}"
                )));
            }
        },
        None => JsonObject::new(),
    };

    for (key, value) in &args.set {
        content.insert(key.clone(), Value::String(value.clone()));
    }

    Ok(content)
}

fn build_request(args: &ConfigArgs) -> Result<ConfigRequest> {
    let mut request = ConfigRequest::new(&args.file, build_content(args)?)
        .with_override(args.override_existing);
    request.owner = args.owner.clone();
    request.group = args.group.clone();
    request.mode = args.mode;
    request.dir_mode = args.dir_mode;
    Ok(request)
}

/// Run the config command
pub fn run_config(args: &ConfigArgs, robustness: RobustnessConfig) -> Result<ConfigReport> {
    let request = build_request(args)?;
    let report = ConfigStore::with_robustness(robustness).reconcile(&request, args.check)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report.to_output(args.diff))?
        );
    } else {
        print_status(report.changed, &report.msg, args.check);
        println!("   {} {}", "file:".dimmed(), args.file.display());
        if args.diff {
            print_diff(&report, &args.file.display().to_string());
        }
    }

    Ok(report)
}

fn print_diff(report: &ConfigReport, label: &str) {
    if !report.diff.has_changes() {
        println!("   {}", "(no content changes)".dimmed());
        return;
    }

    for line in report.diff.unified(label).lines() {
        let colored_line = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") {
            line.cyan()
        } else {
            line.normal()
        };
        println!("{}", colored_line);
    }
}

//! Module protocol: JSON arguments in, one JSON result object out
//!
//! Accepts either the bare argument object or one wrapped in
//! `ANSIBLE_MODULE_ARGS`. Internal `_ansible_*` keys are stripped after
//! reading the check and diff flags.

use std::io::Read;
use std::path::Path;

use hoststate_core::{ConfigStore, FileRelocator, Reconciler};
use hoststate_fs::{JsonObject, RobustnessConfig};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::cli::Module;
use crate::error::{CliError, Result};

const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";
const DIFF_KEY: &str = "_ansible_diff";

/// Parsed module arguments plus the protocol flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub args: JsonObject,
    pub check_mode: bool,
    pub diff: bool,
}

fn read_raw(args_file: Option<&Path>) -> Result<String> {
    match args_file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            CliError::invalid_argument(format!(
                "cannot read arguments from {}: {e}",
                path.display()
            ))
        }),
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn take_flag(args: &mut JsonObject, key: &str) -> bool {
    matches!(args.remove(key), Some(Value::Bool(true)))
}

/// Parse a raw argument document.
pub fn parse_invocation(raw: &str) -> Result<Invocation> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::invalid_argument(format!("arguments are not valid JSON: {e}")))?;

    let mut args = match value {
        Value::Object(mut map) => match map.remove(WRAPPER_KEY) {
            Some(Value::Object(inner)) => inner,
            Some(_) => {
                return Err(CliError::invalid_argument(format!(
                    "{WRAPPER_KEY} must be an object"
                )));
            }
            None => map,
        },
        _ => return Err(CliError::invalid_argument("arguments must be a JSON object")),
    };

    let check_mode = take_flag(&mut args, CHECK_MODE_KEY);
    let diff = take_flag(&mut args, DIFF_KEY);
    args.retain(|key, _| !key.starts_with("_ansible_"));

    Ok(Invocation {
        args,
        check_mode,
        diff,
    })
}

fn reconcile_with<R>(reconciler: &R, invocation: &Invocation) -> Result<R::Report>
where
    R: Reconciler,
    R::Request: DeserializeOwned,
{
    let request: R::Request = serde_json::from_value(Value::Object(invocation.args.clone()))
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok(reconciler.reconcile(&request, invocation.check_mode)?)
}

/// Run one module invocation and return its result object.
pub fn execute(module: Module, invocation: &Invocation, robustness: RobustnessConfig) -> Result<Value> {
    tracing::debug!(?module, check_mode = invocation.check_mode, diff = invocation.diff, "Invoking module");

    let output = match module {
        Module::DefineConfiguration => {
            let store = ConfigStore::with_robustness(robustness);
            reconcile_with(&store, invocation)?.to_output(invocation.diff)
        }
        Module::Move => reconcile_with(&FileRelocator::new(), invocation)?.to_output(),
    };
    Ok(output)
}

/// Run the invoke command
pub fn run_invoke(module: Module, args_file: Option<&Path>, robustness: RobustnessConfig) -> Result<()> {
    let raw = read_raw(args_file)?;
    let invocation = parse_invocation(&raw)?;
    let output = execute(module, &invocation, robustness)?;
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// Result object reported when an invocation fails.
pub fn failure_output(error: &CliError) -> Value {
    json!({
        "failed": true,
        "changed": false,
        "msg": error.to_string(),
        "error_kind": error.kind(),
    })
}

//! Command implementations

pub mod config;
pub mod invoke;
pub mod relocate;

pub use config::run_config;
pub use invoke::{failure_output, run_invoke};
pub use relocate::run_move;

use colored::Colorize;

/// Print the one-line outcome shared by every command.
fn print_status(changed: bool, msg: &str, check: bool) {
    let status = if changed {
        "changed".yellow().bold()
    } else {
        "ok".green().bold()
    };
    if check {
        println!("{} {} {}", status, msg, "(check mode)".dimmed());
    } else {
        println!("{} {}", status, msg);
    }
}

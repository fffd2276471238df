//! Move command implementation

use colored::Colorize;
use hoststate_core::{FileRelocator, MoveReport, MoveRequest};

use super::print_status;
use crate::cli::MoveArgs;
use crate::error::Result;

/// Run the move command
pub fn run_move(args: &MoveArgs) -> Result<MoveReport> {
    let request = MoveRequest::new(&args.src, &args.dest).with_validate(args.validate);
    let report = FileRelocator::new().reconcile(&request, args.check)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.to_output())?);
    } else {
        print_status(report.changed, &report.msg, args.check);
        println!(
            "   {} {} {} {}",
            "src:".dimmed(),
            args.src.display(),
            "dest:".dimmed(),
            args.dest.display()
        );
    }

    Ok(report)
}

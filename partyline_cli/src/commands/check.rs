//! The `sessions` and `check` subcommands.

use anyhow::Result;
use clap::Args;
use partyline_lib::sessions::find_session_overlaps;
use partyline_lib::Engine;

use crate::output::{build_diagnostic_rows, build_session_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct SessionsArgs {
    /// List overlapping session ranges instead of the table
    #[arg(long)]
    pub check: bool,
}

pub fn run_sessions(args: &SessionsArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let sessions = engine.snapshot().sessions().sessions();
    if args.check {
        let overlaps = find_session_overlaps(sessions);
        eprintln!("{} session(s), {} overlap(s)", sessions.len(), overlaps.len());
        if overlaps.is_empty() {
            return Ok(());
        }
        match format {
            OutputFormat::Json => print_json(&overlaps),
            _ => print_rows(build_diagnostic_rows(&overlaps), format)?,
        }
        return Ok(());
    }
    match format {
        OutputFormat::Json => print_json(&sessions),
        _ => print_rows(build_session_rows(sessions), format)?,
    }
    Ok(())
}

pub fn run_check(engine: &Engine, format: &OutputFormat) -> Result<()> {
    let report = engine.integrity_report();
    eprintln!(
        "Snapshot {}: {} issue(s) found",
        engine.as_of(),
        report.len()
    );
    if report.is_empty() {
        return Ok(());
    }
    match format {
        OutputFormat::Json => print_json(&report),
        _ => print_rows(build_diagnostic_rows(&report), format)?,
    }
    Ok(())
}

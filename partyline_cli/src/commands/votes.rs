//! The `vote` and `latest` subcommands.

use anyhow::Result;
use clap::Args;
use partyline_lib::{validation, Engine};

use crate::output::{build_breakdown_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct VoteArgs {
    /// Vote ids (e.g. h102-2025 s30-2025)
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct LatestArgs {
    /// Only the latest vote on this bill (e.g. hr22-119)
    #[arg(long)]
    pub bill: Option<String>,
}

pub fn run_vote(args: &VoteArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let ids = args
        .ids
        .iter()
        .map(|id| validation::validate_id(id))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let breakdowns = engine.per_vote_breakdown(&refs)?;

    match format {
        OutputFormat::Json => print_json(&breakdowns),
        _ => print_rows(build_breakdown_rows(&breakdowns), format)?,
    }
    Ok(())
}

pub fn run_latest(args: &LatestArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let bill = match args.bill {
        Some(ref bill) => Some(validation::validate_bill_id(bill)?.to_string()),
        None => None,
    };

    let latest = engine.latest_votes();
    let ids: Vec<&str> = latest
        .votes
        .iter()
        .filter(|v| bill.is_none() || v.bill_id == bill)
        .map(|v| v.vote_id.as_str())
        .collect();

    if ids.is_empty() {
        match bill {
            Some(ref bill) => eprintln!("No recorded votes on {}.", bill),
            None => eprintln!("No bill or nomination votes in the store."),
        }
        return Ok(());
    }
    if !latest.ties.is_empty() {
        eprintln!(
            "Warning: {} subject(s) had several votes on the same latest date; run 'partyline check' for details.",
            latest.ties.len()
        );
    }

    let breakdowns = engine.per_vote_breakdown(&ids)?;
    match format {
        OutputFormat::Json => print_json(&breakdowns),
        _ => print_rows(build_breakdown_rows(&breakdowns), format)?,
    }
    Ok(())
}

//! The `nomination` and `nominations` subcommands.

use anyhow::Result;
use clap::Args;
use partyline_lib::{validation, Engine};

use crate::output::{
    build_breakdown_rows, build_nomination_ballot_rows, build_nomination_group_rows,
    build_nomination_vote_rows, print_json, print_rows, OutputFormat,
};

#[derive(Args)]
pub struct NominationArgs {
    /// Nomination vote id (e.g. s30-2025)
    pub vote_id: String,

    /// Group ballots by: party, position
    #[arg(long)]
    pub group_by: Option<String>,

    /// Filter by registered party: all, d, r, other
    #[arg(long, default_value = "all", conflicts_with = "group_by")]
    pub party: String,
}

#[derive(Args)]
pub struct NominationsArgs {
    /// Show the party breakdown of each nomination vote, newest first
    #[arg(long)]
    pub summary: bool,
}

pub fn run_nomination(args: &NominationArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let vote_id = validation::validate_id(&args.vote_id)?;
    if let Some(title) = engine.nomination_title(&vote_id)? {
        eprintln!("{}", title);
    }

    if let Some(ref group_by) = args.group_by {
        let group_by = validation::validate_group_by(group_by)?;
        let groups = engine.per_nomination_group(&vote_id, group_by)?;
        match format {
            OutputFormat::Json => print_json(&groups),
            _ => print_rows(build_nomination_group_rows(&groups), format)?,
        }
        return Ok(());
    }

    let party = validation::validate_nomination_party(&args.party)?;
    let ballots = engine.nomination_ballots(&vote_id, party)?;
    match format {
        OutputFormat::Json => print_json(&ballots),
        _ => print_rows(build_nomination_ballot_rows(&ballots), format)?,
    }
    Ok(())
}

pub fn run_list(args: &NominationsArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    if args.summary {
        let breakdowns = engine.nomination_summary();
        match format {
            OutputFormat::Json => print_json(&breakdowns),
            _ => print_rows(build_breakdown_rows(&breakdowns), format)?,
        }
        return Ok(());
    }

    let votes = engine.nomination_votes();
    eprintln!("{} nomination votes", votes.len());
    match format {
        OutputFormat::Json => print_json(&votes),
        _ => print_rows(build_nomination_vote_rows(&votes), format)?,
    }
    Ok(())
}

//! The `legislator` subcommand: one member's party-line profile.

use anyhow::Result;
use clap::Args;
use partyline_lib::{validation, Engine};

use crate::output::{build_ballot_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct LegislatorArgs {
    /// Legislator id or Senate LIS id
    pub id: String,

    /// List every ballot, newest first
    #[arg(long)]
    pub ballots: bool,
}

pub fn run(args: &LegislatorArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let id = validation::validate_id(&args.id)?;
    let profile = engine.legislator_profile(&id)?;

    if args.ballots {
        let ballots = engine.legislator_ballots(&id)?;
        match format {
            OutputFormat::Json => print_json(&ballots),
            _ => print_rows(build_ballot_rows(&ballots), format)?,
        }
        return Ok(());
    }

    if let OutputFormat::Json = format {
        print_json(&profile);
        return Ok(());
    }

    let l = &profile.legislator;
    println!("{} ({}-{})", l.name, l.party.code(), l.state);
    if l.party != l.caucus {
        println!("Caucuses with: {}", l.caucus.code());
    }
    println!(
        "All votes:        {} party line / {} classified ({})",
        profile.all_votes.party_line,
        profile.all_votes.classified(),
        format_fraction(profile.party_line_percent)
    );
    println!(
        "Nomination votes: {} party line / {} classified ({})",
        profile.nomination_votes.party_line,
        profile.nomination_votes.classified(),
        format_fraction(profile.nomination_party_line_percent)
    );
    println!(
        "Abstained: {}  Unclassifiable: {}",
        profile.all_votes.abstain, profile.all_votes.unclassifiable
    );

    let sponsored = engine.sponsored_bills(&l.id);
    if !sponsored.is_empty() {
        println!("Sponsored bills: {}", sponsored.len());
    }

    Ok(())
}

fn format_fraction(fraction: Option<f64>) -> String {
    fraction
        .map(|f| format!("{:.1}%", f * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

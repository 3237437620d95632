//! The `bill` and `bills` subcommands.

use anyhow::Result;
use clap::Args;
use partyline_lib::{validation, BillInformation, BillVoteRecord, Engine};
use serde::Serialize;

use crate::commands::paginate;
use crate::output::{build_bill_rows, build_bill_vote_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct BillArgs {
    /// Bill id (e.g. hr22-119)
    pub bill_id: String,
}

#[derive(Args)]
pub struct BillsArgs {
    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub page_size: i64,
}

#[derive(Serialize)]
struct BillDetail<'a> {
    bill: &'a BillInformation,
    votes: &'a [BillVoteRecord],
}

pub fn run_bill(args: &BillArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let bill_id = validation::validate_bill_id(&args.bill_id)?.to_string();
    let info = engine.bill_information(&bill_id)?;
    let history = engine.bill_vote_history(&bill_id)?;

    if let OutputFormat::Json = format {
        print_json(&BillDetail {
            bill: &info,
            votes: &history,
        });
        return Ok(());
    }

    eprintln!("{}: {}", info.bill.bill_id, info.bill.display_title());
    match (&info.sponsor_name, &info.sponsor_party) {
        (Some(name), Some(party)) => eprintln!(
            "Sponsor: {} ({}-{})",
            name,
            party.code(),
            info.sponsor_state.as_deref().unwrap_or("?")
        ),
        _ => eprintln!("Sponsor: unknown"),
    }
    eprintln!("Status: {} ({})", info.bill.status, info.bill.status_at.date());

    if history.is_empty() {
        eprintln!("No recorded votes.");
        return Ok(());
    }
    print_rows(build_bill_vote_rows(&history), format)
}

pub fn run_list(args: &BillsArgs, engine: &Engine, format: &OutputFormat) -> Result<()> {
    let page = validation::validate_page(args.page)?;
    let page_size = validation::validate_page_size(args.page_size)?;

    let bills = engine.bills_having_votes();
    let total = bills.len();
    let (bills, total_pages) = paginate(bills, page, page_size);
    eprintln!("Page {}/{} ({} total bills)", page, total_pages, total);

    match format {
        OutputFormat::Json => print_json(&bills),
        _ => print_rows(build_bill_rows(&bills), format)?,
    }
    Ok(())
}

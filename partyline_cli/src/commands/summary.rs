//! The `summary` subcommand: legislators ranked by broke-party-line percent.

use anyhow::Result;
use clap::Args;
use partyline_lib::{validation, Engine, EngineConfig, SortOrder, SummaryFilter};

use crate::commands::{first_rank, paginate};
use crate::output::{build_summary_rows, print_json, print_rows, OutputFormat};

/// Arguments for the `summary` subcommand.
///
/// Counts only the latest roll call on each bill and nomination.
#[derive(Args)]
pub struct SummaryArgs {
    /// Filter by US state code (e.g. CA, TX, NY)
    #[arg(long)]
    pub state: Option<String>,

    /// Filter by chamber: senate, house, all
    #[arg(long, default_value = "all")]
    pub chamber: String,

    /// Filter by registered party: democrat (d), republican (r), independent (i), all
    #[arg(long, default_value = "all")]
    pub party: String,

    /// Restrict to these legislator ids (repeatable; LIS ids accepted)
    #[arg(long = "legislator")]
    pub legislators: Vec<String>,

    /// Sort order: desc, asc (defaults to the config file's default_sort)
    #[arg(long)]
    pub sort: Option<String>,

    /// Shorthand for --sort asc
    #[arg(long, conflicts_with = "sort")]
    pub asc: bool,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub page_size: i64,
}

pub fn run(
    args: &SummaryArgs,
    engine: &Engine,
    config: &EngineConfig,
    format: &OutputFormat,
) -> Result<()> {
    let page = validation::validate_page(args.page)?;
    let page_size = validation::validate_page_size(args.page_size)?;

    let filter = SummaryFilter {
        state: args
            .state
            .as_deref()
            .map(validation::validate_state)
            .transpose()?,
        chamber: validation::validate_chamber(&args.chamber)?,
        party: validation::validate_party(&args.party)?,
        legislator_ids: args
            .legislators
            .iter()
            .map(|id| validation::validate_id(id))
            .collect::<Result<_, _>>()?,
    };

    let order = if args.asc {
        SortOrder::Ascending
    } else {
        match args.sort {
            Some(ref sort) => validation::validate_sort(sort)?,
            None => config.default_sort,
        }
    };

    let summaries = engine.per_legislator_summary(&filter, order);
    let total = summaries.len();
    let (summaries, total_pages) = paginate(summaries, page, page_size);

    eprintln!(
        "Page {}/{} ({} legislators, data as of {})",
        page,
        total_pages,
        total,
        engine.as_of()
    );

    match format {
        OutputFormat::Json => print_json(&summaries),
        _ => print_rows(build_summary_rows(&summaries, first_rank(page, page_size)), format)?,
    }

    Ok(())
}

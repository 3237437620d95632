//! Bill-centric views.

use chrono::NaiveDateTime;
use rollcall_types::{Amendment, Bill, Legislator, Party, VoteEvent};
use serde::Serialize;

use crate::aggregate::PartyBreakdown;
use crate::sponsor::SponsorResolution;

/// A bill that received at least one recorded vote, for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListItem {
    pub bill_id: String,
    pub title: String,
    pub status: String,
    pub status_at: NaiveDateTime,
    pub sponsor_id: Option<String>,
    pub sponsor_name: Option<String>,
    /// Sponsor's caucus, for display.
    pub sponsor_caucus: Option<Party>,
    pub vote_count: usize,
}

impl BillListItem {
    pub fn new(bill: &Bill, sponsor: Option<&Legislator>, vote_count: usize) -> Self {
        Self {
            bill_id: bill.bill_id.clone(),
            title: bill.display_title().to_string(),
            status: bill.status.clone(),
            status_at: bill.status_at,
            sponsor_id: bill.sponsor_id.clone(),
            sponsor_name: sponsor.map(|s| s.name.clone()),
            sponsor_caucus: sponsor.map(|s| s.caucus.clone()),
            vote_count,
        }
    }
}

/// A bill with its sponsor joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillInformation {
    #[serde(flatten)]
    pub bill: Bill,
    pub sponsor_name: Option<String>,
    pub sponsor_party: Option<Party>,
    pub sponsor_caucus: Option<Party>,
    pub sponsor_state: Option<String>,
}

impl BillInformation {
    pub fn new(bill: &Bill, sponsor: Option<&Legislator>) -> Self {
        Self {
            bill: bill.clone(),
            sponsor_name: sponsor.map(|s| s.name.clone()),
            sponsor_party: sponsor.map(|s| s.party.clone()),
            sponsor_caucus: sponsor.map(|s| s.caucus.clone()),
            sponsor_state: sponsor.map(|s| s.state.clone()),
        }
    }
}

/// One roll call in a bill's vote history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillVoteRecord {
    pub vote: VoteEvent,
    pub amendment: Option<Amendment>,
    pub sponsor: SponsorResolution,
    pub breakdown: PartyBreakdown,
}

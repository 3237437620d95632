//! Legislator-centric views.

use chrono::NaiveDateTime;
use rollcall_types::{Legislator, VoteCategory, VoteEvent};
use serde::Serialize;

use crate::aggregate::ClassificationCounts;
use crate::classify::ClassifiedBallot;

/// One of a legislator's classified ballots with the vote it was cast on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislatorBallot {
    #[serde(flatten)]
    pub ballot: ClassifiedBallot,
    pub date: NaiveDateTime,
    pub category: VoteCategory,
    pub bill_id: Option<String>,
    pub nomination_title: Option<String>,
    pub result: String,
}

impl LegislatorBallot {
    pub fn new(ballot: ClassifiedBallot, vote: &VoteEvent) -> Self {
        Self {
            ballot,
            date: vote.date,
            category: vote.category.clone(),
            bill_id: vote.bill_id.clone(),
            nomination_title: vote.nomination_title.clone(),
            result: vote.result.clone(),
        }
    }

    /// Bill id or nomination title, whichever the vote concerns.
    pub fn subject(&self) -> &str {
        self.bill_id
            .as_deref()
            .or(self.nomination_title.as_deref())
            .unwrap_or("")
    }
}

/// Classification totals for one legislator across every recorded vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislatorProfile {
    pub legislator: Legislator,
    pub all_votes: ClassificationCounts,
    pub nomination_votes: ClassificationCounts,
    pub party_line_percent: Option<f64>,
    pub nomination_party_line_percent: Option<f64>,
}

impl LegislatorProfile {
    pub fn new(legislator: Legislator, ballots: &[LegislatorBallot]) -> Self {
        let all_votes: ClassificationCounts = ballots.iter().map(|b| &b.ballot).collect();
        let nomination_votes: ClassificationCounts = ballots
            .iter()
            .filter(|b| b.category == VoteCategory::Nomination)
            .map(|b| &b.ballot)
            .collect();
        Self {
            legislator,
            party_line_percent: all_votes.party_line_percent(),
            nomination_party_line_percent: nomination_votes.party_line_percent(),
            all_votes,
            nomination_votes,
        }
    }
}

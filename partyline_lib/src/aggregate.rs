//! Rolls classified ballots up into per-vote breakdowns and per-legislator
//! summaries.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDateTime;
use rollcall_types::{Chamber, Legislator, Party, VoteCategory, VoteEvent};
use serde::{Deserialize, Serialize};

use crate::classify::{Classification, ClassifiedBallot};
use crate::error::Diagnostic;

/// Classified ballot counts for one vote, bucketed by caucus.
///
/// The four major-party buckets only count classified ballots. Members
/// caucusing with neither major party are counted in the `other_*` buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBreakdown {
    pub dem_party_line: u32,
    pub dem_not_party_line: u32,
    pub rep_party_line: u32,
    pub rep_not_party_line: u32,
    pub other_party_line: u32,
    pub other_not_party_line: u32,
    pub abstain_count: u32,
    pub unclassifiable_count: u32,
}

impl PartyBreakdown {
    pub fn add(&mut self, ballot: &ClassifiedBallot) {
        let (party_line, not_party_line) = match ballot.caucus {
            Party::Democrat => (&mut self.dem_party_line, &mut self.dem_not_party_line),
            Party::Republican => (&mut self.rep_party_line, &mut self.rep_not_party_line),
            _ => (&mut self.other_party_line, &mut self.other_not_party_line),
        };
        match ballot.classification {
            Classification::PartyLine => *party_line += 1,
            Classification::NotPartyLine => *not_party_line += 1,
            Classification::Abstain => self.abstain_count += 1,
            Classification::Unclassifiable => self.unclassifiable_count += 1,
        }
    }

    pub fn tally<'a>(ballots: impl IntoIterator<Item = &'a ClassifiedBallot>) -> Self {
        let mut breakdown = Self::default();
        for ballot in ballots {
            breakdown.add(ballot);
        }
        breakdown
    }

    /// Ballots counted in the party-line buckets.
    pub fn classified_total(&self) -> u32 {
        self.dem_party_line
            + self.dem_not_party_line
            + self.rep_party_line
            + self.rep_not_party_line
            + self.other_party_line
            + self.other_not_party_line
    }
}

/// Party breakdown of one vote event with the vote's own details.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBreakdown {
    pub vote_id: String,
    pub date: NaiveDateTime,
    pub chamber: Chamber,
    pub category: VoteCategory,
    pub bill_id: Option<String>,
    pub nomination_title: Option<String>,
    pub result: String,
    pub sponsor_party: Option<Party>,
    #[serde(flatten)]
    pub breakdown: PartyBreakdown,
}

impl VoteBreakdown {
    pub fn new(vote: &VoteEvent, sponsor_party: Option<Party>, breakdown: PartyBreakdown) -> Self {
        Self {
            vote_id: vote.vote_id.clone(),
            date: vote.date,
            chamber: vote.chamber,
            category: vote.category.clone(),
            bill_id: vote.bill_id.clone(),
            nomination_title: vote.nomination_title.clone(),
            result: vote.result.clone(),
            sponsor_party,
            breakdown,
        }
    }
}

/// Chamber restriction for summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChamberFilter {
    Senate,
    House,
    #[default]
    Both,
}

impl ChamberFilter {
    pub fn matches(self, chamber: Chamber) -> bool {
        match self {
            Self::Senate => chamber == Chamber::Senate,
            Self::House => chamber == Chamber::House,
            Self::Both => true,
        }
    }
}

impl From<Chamber> for ChamberFilter {
    fn from(chamber: Chamber) -> Self {
        match chamber {
            Chamber::Senate => Self::Senate,
            Chamber::House => Self::House,
        }
    }
}

/// Population filter for legislator summaries. All set criteria must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFilter {
    /// Two-letter state code.
    pub state: Option<String>,
    pub chamber: ChamberFilter,
    /// Registered party.
    pub party: Option<Party>,
    /// Empty means no restriction.
    pub legislator_ids: Vec<String>,
}

impl SummaryFilter {
    pub fn matches(&self, legislator: &Legislator) -> bool {
        self.state
            .as_deref()
            .map_or(true, |s| legislator.state.eq_ignore_ascii_case(s))
            && self.chamber.matches(legislator.term_type)
            && self.party.as_ref().map_or(true, |p| legislator.party == *p)
            && (self.legislator_ids.is_empty()
                || self.legislator_ids.iter().any(|id| legislator.matches_id(id)))
    }
}

/// Ranking direction for legislator summaries by broke-party-line percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "desc")]
    Descending,
    #[serde(rename = "asc")]
    Ascending,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desc" | "descending" => Ok(Self::Descending),
            "asc" | "ascending" => Ok(Self::Ascending),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Guarded ratio: `None` when the denominator is zero.
pub fn percent(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(f64::from(numerator) / f64::from(denominator))
    }
}

/// Lifetime party-line record of one legislator over the latest-vote set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislatorSummary {
    pub legislator_id: String,
    pub name: String,
    pub state: String,
    pub district: String,
    pub chamber: Chamber,
    pub party: Party,
    pub caucus: Party,
    pub broke_count: u32,
    /// Classified, non-abstaining ballots.
    pub total_count: u32,
    /// `broke_count / total_count` as a fraction, absent when `total_count` is zero.
    pub broke_percent: Option<f64>,
}

impl LegislatorSummary {
    fn empty(legislator: &Legislator) -> Self {
        Self {
            legislator_id: legislator.id.clone(),
            name: legislator.name.clone(),
            state: legislator.state.clone(),
            district: legislator.district.clone(),
            chamber: legislator.term_type,
            party: legislator.party.clone(),
            caucus: legislator.caucus.clone(),
            broke_count: 0,
            total_count: 0,
            broke_percent: None,
        }
    }
}

/// One summary per legislator that cast at least one of `ballots` and passes
/// `filter`, in a single pass over the ballots. Output is unsorted.
pub fn summarize<'a>(
    ballots: impl IntoIterator<Item = &'a ClassifiedBallot>,
    legislators: &[Legislator],
    filter: &SummaryFilter,
) -> Vec<LegislatorSummary> {
    let roster: HashMap<&str, &Legislator> = legislators
        .iter()
        .filter(|l| filter.matches(l))
        .map(|l| (l.id.as_str(), l))
        .collect();

    let mut summaries: HashMap<&str, LegislatorSummary> = HashMap::new();
    for ballot in ballots {
        let Some(legislator) = roster.get(ballot.legislator_id.as_str()) else {
            continue;
        };
        let summary = summaries
            .entry(legislator.id.as_str())
            .or_insert_with(|| LegislatorSummary::empty(legislator));
        match ballot.classification {
            Classification::PartyLine => summary.total_count += 1,
            Classification::NotPartyLine => {
                summary.total_count += 1;
                summary.broke_count += 1;
            }
            Classification::Abstain | Classification::Unclassifiable => {}
        }
    }

    summaries
        .into_values()
        .map(|mut s| {
            s.broke_percent = percent(s.broke_count, s.total_count);
            s
        })
        .collect()
}

/// Compare `a/b` against `c/d` exactly. Both denominators must be non-zero.
fn cmp_ratio(a: u32, b: u32, c: u32, d: u32) -> Ordering {
    (u64::from(a) * u64::from(d)).cmp(&(u64::from(c) * u64::from(b)))
}

/// Sort summaries by broke percent in `order`, then broke count descending,
/// then legislator id. Entries without a percent go last in either order.
pub fn sort_summaries(summaries: &mut [LegislatorSummary], order: SortOrder) {
    summaries.sort_by(|x, y| {
        let by_percent = match (x.total_count, y.total_count) {
            (0, 0) => Ordering::Equal,
            (0, _) => return Ordering::Greater,
            (_, 0) => return Ordering::Less,
            _ => {
                let ascending = cmp_ratio(x.broke_count, x.total_count, y.broke_count, y.total_count);
                match order {
                    SortOrder::Ascending => ascending,
                    SortOrder::Descending => ascending.reverse(),
                }
            }
        };
        by_percent
            .then_with(|| y.broke_count.cmp(&x.broke_count))
            .then_with(|| x.legislator_id.cmp(&y.legislator_id))
    });
}

/// Ratio diagnostics for summaries with no classified ballots.
pub fn undefined_ratios(summaries: &[LegislatorSummary]) -> Vec<Diagnostic> {
    summaries
        .iter()
        .filter(|s| s.broke_percent.is_none())
        .map(|s| {
            tracing::debug!("legislator {}: no classified ballots, percent undefined", s.legislator_id);
            Diagnostic::UndefinedRatio {
                legislator_id: s.legislator_id.clone(),
            }
        })
        .collect()
}

/// Counts of each classification over a set of ballots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationCounts {
    pub party_line: u32,
    pub not_party_line: u32,
    pub abstain: u32,
    pub unclassifiable: u32,
}

impl ClassificationCounts {
    pub fn add(&mut self, classification: Classification) {
        match classification {
            Classification::PartyLine => self.party_line += 1,
            Classification::NotPartyLine => self.not_party_line += 1,
            Classification::Abstain => self.abstain += 1,
            Classification::Unclassifiable => self.unclassifiable += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.party_line + self.not_party_line + self.abstain + self.unclassifiable
    }

    pub fn classified(&self) -> u32 {
        self.party_line + self.not_party_line
    }

    pub fn party_line_percent(&self) -> Option<f64> {
        percent(self.party_line, self.classified())
    }

    pub fn not_party_line_percent(&self) -> Option<f64> {
        percent(self.not_party_line, self.classified())
    }
}

impl<'a> FromIterator<&'a ClassifiedBallot> for ClassificationCounts {
    fn from_iter<I: IntoIterator<Item = &'a ClassifiedBallot>>(iter: I) -> Self {
        let mut counts = Self::default();
        for ballot in iter {
            counts.add(ballot.classification);
        }
        counts
    }
}

//! Latest-vote selection.
//!
//! A subject (a bill, or a nominee) can be voted on many times. Aggregate
//! views count only the most recent roll call per subject.

use std::collections::HashMap;
use std::fmt;

use rollcall_types::VoteEvent;
use serde::Serialize;

use crate::error::Diagnostic;

/// Characters of the nomination title used as the subject key when a vote
/// has no bill.
pub const NOMINATION_KEY_CHARS: usize = 10;

/// Subject a vote event is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum MatchingKey {
    Bill(String),
    /// The first [`NOMINATION_KEY_CHARS`] characters of the nomination title.
    Nomination(String),
}

impl MatchingKey {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bill(key) | Self::Nomination(key) => key,
        }
    }
}

impl fmt::Display for MatchingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject key of `vote`: its bill id, else the nomination title prefix.
///
/// Votes with neither have no subject and never appear in the latest set.
pub fn unique_matching_field(vote: &VoteEvent) -> Option<MatchingKey> {
    if let Some(bill_id) = vote.bill_id.as_deref().filter(|b| !b.is_empty()) {
        return Some(MatchingKey::Bill(bill_id.to_string()));
    }
    vote.nomination_title
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|title| MatchingKey::Nomination(title.chars().take(NOMINATION_KEY_CHARS).collect()))
}

/// Result of latest-vote selection.
#[derive(Debug, Clone, Default)]
pub struct LatestSelection {
    /// One vote per subject, date ascending.
    pub votes: Vec<VoteEvent>,
    /// Subjects whose latest date was shared by more than one vote.
    pub ties: Vec<Diagnostic>,
}

/// Keep only the most recent vote per subject.
///
/// When several votes share a subject's latest date, the one with the highest
/// vote number is kept (vote id breaks any remaining tie) and the tie is
/// reported.
pub fn select_latest(votes: &[VoteEvent]) -> LatestSelection {
    let mut groups: HashMap<MatchingKey, Vec<&VoteEvent>> = HashMap::new();
    for vote in votes {
        if let Some(key) = unique_matching_field(vote) {
            groups.entry(key).or_default().push(vote);
        }
    }

    let mut keys: Vec<&MatchingKey> = groups.keys().collect();
    keys.sort();

    let mut selection = LatestSelection::default();
    for key in keys {
        let group = &groups[key];
        let Some(chosen) = group
            .iter()
            .copied()
            .max_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then(a.vote_number.cmp(&b.vote_number))
                    .then_with(|| a.vote_id.cmp(&b.vote_id))
            })
        else {
            continue;
        };

        let mut discarded: Vec<String> = group
            .iter()
            .filter(|v| v.date == chosen.date && v.vote_id != chosen.vote_id)
            .map(|v| v.vote_id.clone())
            .collect();
        if !discarded.is_empty() {
            discarded.sort();
            let diagnostic = Diagnostic::UnresolvedLatestVoteTie {
                key: key.to_string(),
                chosen: chosen.vote_id.clone(),
                discarded,
            };
            tracing::warn!("{}", diagnostic);
            selection.ties.push(diagnostic);
        }
        selection.votes.push(chosen.clone());
    }

    selection.votes.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.vote_number.cmp(&b.vote_number))
            .then_with(|| a.vote_id.cmp(&b.vote_id))
    });
    selection
}

/// The latest vote per subject, date ascending.
pub fn latest_votes_only(votes: &[VoteEvent]) -> Vec<VoteEvent> {
    select_latest(votes).votes
}

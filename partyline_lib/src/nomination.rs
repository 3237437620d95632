//! Nomination views: two-level groupings of one nomination vote's ballots.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rollcall_types::{Party, Position, VoteEvent};
use serde::{Deserialize, Serialize};

use crate::classify::{Classification, ClassifiedBallot};

/// First-level key of a nomination grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Party, then position.
    #[default]
    Party,
    /// Position, then party.
    Position,
}

/// Which legislators to list for a nomination vote, by registered party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NominationPartyFilter {
    #[default]
    All,
    #[serde(rename = "d")]
    Democrat,
    #[serde(rename = "r")]
    Republican,
    /// Neither Democrat nor Republican.
    Other,
}

impl NominationPartyFilter {
    pub fn matches(self, party: &Party) -> bool {
        match self {
            Self::All => true,
            Self::Democrat => *party == Party::Democrat,
            Self::Republican => *party == Party::Republican,
            Self::Other => !party.is_major(),
        }
    }
}

/// One senator's ballot on a nomination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationBallot {
    pub vote_id: String,
    pub legislator_id: String,
    pub name: String,
    pub state: String,
    /// Registered party.
    pub party: Party,
    pub caucus: Party,
    pub position: Position,
    pub classification: Classification,
}

impl From<&ClassifiedBallot> for NominationBallot {
    fn from(ballot: &ClassifiedBallot) -> Self {
        Self {
            vote_id: ballot.vote_id.clone(),
            legislator_id: ballot.legislator_id.clone(),
            name: ballot.name.clone(),
            state: ballot.state.clone(),
            party: ballot.party.clone(),
            caucus: ballot.caucus.clone(),
            position: ballot.position.clone(),
            classification: ballot.classification,
        }
    }
}

/// Outer key, inner key, ballots. Both levels iterate in key order.
pub type NominationGroups = BTreeMap<String, BTreeMap<String, Vec<NominationBallot>>>;

/// Re-key ballots into a two-level grouping. Ballots within a group are
/// ordered by legislator name.
pub fn group_nomination_ballots(ballots: &[NominationBallot], group_by: GroupBy) -> NominationGroups {
    let mut groups = NominationGroups::new();
    for ballot in ballots {
        let party = ballot.party.code().to_string();
        let position = ballot.position.as_str().to_string();
        let (outer, inner) = match group_by {
            GroupBy::Party => (party, position),
            GroupBy::Position => (position, party),
        };
        groups
            .entry(outer)
            .or_default()
            .entry(inner)
            .or_default()
            .push(ballot.clone());
    }
    for inner in groups.values_mut() {
        for members in inner.values_mut() {
            members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.legislator_id.cmp(&b.legislator_id)));
        }
    }
    groups
}

/// A nomination roll call as listed in the nomination index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationVote {
    pub vote_id: String,
    pub vote_number: i64,
    pub date: NaiveDateTime,
    pub title: Option<String>,
    pub result: String,
}

impl From<&VoteEvent> for NominationVote {
    fn from(vote: &VoteEvent) -> Self {
        Self {
            vote_id: vote.vote_id.clone(),
            vote_number: vote.vote_number,
            date: vote.date,
            title: vote.nomination_title.clone(),
            result: vote.result.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nb(id: &str, name: &str, party: Party, position: Position) -> NominationBallot {
        NominationBallot {
            vote_id: "s1".to_string(),
            legislator_id: id.to_string(),
            name: name.to_string(),
            state: "TX".to_string(),
            caucus: party.clone(),
            party,
            position,
            classification: Classification::PartyLine,
        }
    }

    fn ballots() -> Vec<NominationBallot> {
        vec![
            nb("1", "Young", Party::Republican, Position::Yea),
            nb("2", "Adams", Party::Republican, Position::Yea),
            nb("3", "Baker", Party::Democrat, Position::Nay),
            nb("4", "Clark", Party::Democrat, Position::Yea),
            nb("5", "King", Party::Independent, Position::NotVoting),
        ]
    }

    #[test]
    fn test_group_by_party_then_position() {
        let groups = group_nomination_ballots(&ballots(), GroupBy::Party);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["D", "I", "R"]);
        let republicans = &groups["R"]["Yea"];
        assert_eq!(
            republicans.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            vec!["Adams", "Young"]
        );
        assert_eq!(groups["D"].len(), 2);
        assert_eq!(groups["I"]["Not Voting"].len(), 1);
    }

    #[test]
    fn test_group_by_position_then_party() {
        let groups = group_nomination_ballots(&ballots(), GroupBy::Position);
        assert_eq!(
            groups.keys().collect::<Vec<_>>(),
            vec!["Nay", "Not Voting", "Yea"]
        );
        assert_eq!(groups["Yea"]["R"].len(), 2);
        assert_eq!(groups["Yea"]["D"].len(), 1);
        assert_eq!(groups["Nay"]["D"][0].name, "Baker");
    }

    #[test]
    fn test_groupings_hold_the_same_ballots() {
        let count = |g: &NominationGroups| g.values().flat_map(|i| i.values()).map(Vec::len).sum::<usize>();
        let b = ballots();
        assert_eq!(count(&group_nomination_ballots(&b, GroupBy::Party)), b.len());
        assert_eq!(count(&group_nomination_ballots(&b, GroupBy::Position)), b.len());
    }

    #[test]
    fn test_party_filter() {
        assert!(NominationPartyFilter::All.matches(&Party::Independent));
        assert!(NominationPartyFilter::Democrat.matches(&Party::Democrat));
        assert!(!NominationPartyFilter::Democrat.matches(&Party::Republican));
        assert!(NominationPartyFilter::Other.matches(&Party::Independent));
        assert!(!NominationPartyFilter::Other.matches(&Party::Republican));
    }
}

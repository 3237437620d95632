//! Per-ballot party-line classification.

use std::collections::HashMap;

use rollcall_types::{Ballot, Chamber, Legislator, Party, Position, VoteEvent};
use serde::Serialize;

/// How a single ballot relates to its party line.
///
/// Only `PartyLine` and `NotPartyLine` count toward party-line totals and
/// denominators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    PartyLine,
    NotPartyLine,
    /// Neither Yea nor Nay. Party-line status does not apply.
    Abstain,
    /// Yea or Nay on a vote whose sponsor party is unknown.
    Unclassifiable,
}

impl Classification {
    pub fn is_abstain(self) -> bool {
        self == Self::Abstain
    }

    /// Party-line status, defined only for classified ballots.
    pub fn is_party_line(self) -> Option<bool> {
        match self {
            Self::PartyLine => Some(true),
            Self::NotPartyLine => Some(false),
            Self::Abstain | Self::Unclassifiable => None,
        }
    }

    pub fn is_classified(self) -> bool {
        self.is_party_line().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PartyLine => "party line",
            Self::NotPartyLine => "broke party line",
            Self::Abstain => "abstain",
            Self::Unclassifiable => "unclassifiable",
        }
    }
}

/// Classify one ballot against its vote's sponsor party.
///
/// A ballot is party-line when the legislator did not actively oppose their
/// caucus's side: Yea on a measure sponsored by their caucus, or anything but
/// Yea on one sponsored by another party. Abstention is checked first, so a
/// non-vote is `Abstain` even when the sponsor party is unknown.
pub fn classify(position: &Position, caucus: &Party, sponsor_party: Option<&Party>) -> Classification {
    if position.is_abstain() {
        return Classification::Abstain;
    }
    let Some(sponsor_party) = sponsor_party else {
        return Classification::Unclassifiable;
    };
    let own_side = caucus == sponsor_party;
    let voted_yea = *position == Position::Yea;
    if own_side == voted_yea {
        Classification::PartyLine
    } else {
        Classification::NotPartyLine
    }
}

/// A ballot joined with its legislator and classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedBallot {
    pub vote_id: String,
    /// Canonical legislator id, even when the ballot was keyed by LIS id.
    pub legislator_id: String,
    pub name: String,
    pub state: String,
    pub chamber: Chamber,
    pub party: Party,
    pub caucus: Party,
    pub position: Position,
    pub sponsor_party: Option<Party>,
    pub classification: Classification,
}

impl ClassifiedBallot {
    pub fn new(ballot: &Ballot, legislator: &Legislator, sponsor_party: Option<&Party>) -> Self {
        Self {
            vote_id: ballot.vote_id.clone(),
            legislator_id: legislator.id.clone(),
            name: legislator.name.clone(),
            state: legislator.state.clone(),
            chamber: legislator.term_type,
            party: legislator.party.clone(),
            caucus: legislator.caucus.clone(),
            position: ballot.position.clone(),
            sponsor_party: sponsor_party.cloned(),
            classification: classify(&ballot.position, &legislator.caucus, sponsor_party),
        }
    }

    pub fn is_abstain(&self) -> bool {
        self.classification.is_abstain()
    }

    pub fn is_party_line(&self) -> Option<bool> {
        self.classification.is_party_line()
    }
}

/// Classify every ballot cast on one of `vote_events`.
///
/// `sponsor_party` supplies each vote's resolved sponsor party. Ballots on
/// votes outside `vote_events`, or from legislators missing from
/// `legislators`, are skipped. Legislators are matched on id, then LIS id.
pub fn classify_ballots<F>(
    vote_events: &[VoteEvent],
    ballots: &[Ballot],
    legislators: &[Legislator],
    mut sponsor_party: F,
) -> Vec<ClassifiedBallot>
where
    F: FnMut(&VoteEvent) -> Option<Party>,
{
    let sponsors: HashMap<&str, Option<Party>> = vote_events
        .iter()
        .map(|v| (v.vote_id.as_str(), sponsor_party(v)))
        .collect();

    let mut by_id: HashMap<&str, &Legislator> = HashMap::new();
    let mut by_lis: HashMap<&str, &Legislator> = HashMap::new();
    for legislator in legislators {
        by_id.insert(legislator.id.as_str(), legislator);
        if let Some(lis) = legislator.lis_id.as_deref() {
            by_lis.insert(lis, legislator);
        }
    }

    ballots
        .iter()
        .filter_map(|ballot| {
            let sponsor = sponsors.get(ballot.vote_id.as_str())?;
            let id = ballot.legislator_id.as_str();
            let legislator = by_id.get(id).or_else(|| by_lis.get(id))?;
            Some(ClassifiedBallot::new(ballot, legislator, sponsor.as_ref()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::*;

    #[test]
    fn test_truth_table() {
        let d = Party::Democrat;
        let r = Party::Republican;
        assert_eq!(classify(&Position::Yea, &d, Some(&d)), Classification::PartyLine);
        assert_eq!(classify(&Position::Nay, &d, Some(&d)), Classification::NotPartyLine);
        assert_eq!(classify(&Position::Yea, &d, Some(&r)), Classification::NotPartyLine);
        assert_eq!(classify(&Position::Nay, &d, Some(&r)), Classification::PartyLine);
    }

    #[test]
    fn test_abstain_has_no_party_line_status() {
        let d = Party::Democrat;
        for position in [
            Position::Present,
            Position::NotVoting,
            Position::Other("Guilty".to_string()),
        ] {
            let c = classify(&position, &d, Some(&d));
            assert_eq!(c, Classification::Abstain);
            assert_eq!(c.is_party_line(), None);
            assert_eq!(classify(&position, &d, None), Classification::Abstain);
        }
    }

    #[test]
    fn test_unknown_sponsor_is_unclassifiable() {
        let c = classify(&Position::Yea, &Party::Republican, None);
        assert_eq!(c, Classification::Unclassifiable);
        assert_eq!(c.is_party_line(), None);
        assert!(!c.is_classified());
    }

    #[test]
    fn test_independent_judged_by_caucus() {
        let sanders = legislator("S1", Chamber::Senate, Party::Independent, Party::Democrat);
        let vote = bill_vote("s1", 1, "2025-03-01", "s5-119");
        let ballots = vec![ballot("s1", "S1", Position::Nay)];
        let classified = classify_ballots(&[vote], &ballots, &[sanders], |_| {
            Some(Party::Republican)
        });
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].classification, Classification::PartyLine);
        assert_eq!(classified[0].party, Party::Independent);
        assert_eq!(classified[0].caucus, Party::Democrat);
    }

    #[test]
    fn test_caucus_d_scenarios() {
        let member = legislator("L", Chamber::House, Party::Democrat, Party::Democrat);
        let votes = vec![
            bill_vote("h1", 1, "2025-03-01", "hr1-119"),
            bill_vote("h2", 2, "2025-03-02", "hr2-119"),
            bill_vote("h3", 3, "2025-03-03", "hr3-119"),
        ];
        let ballots = vec![
            ballot("h1", "L", Position::Yea),
            ballot("h2", "L", Position::Yea),
            ballot("h3", "L", Position::Present),
        ];
        let classified = classify_ballots(&votes, &ballots, &[member], |v| {
            match v.bill_id.as_deref() {
                Some("hr1-119") => Some(Party::Democrat),
                _ => Some(Party::Republican),
            }
        });
        let by_vote: HashMap<&str, &ClassifiedBallot> = classified
            .iter()
            .map(|c| (c.vote_id.as_str(), c))
            .collect();
        assert_eq!(by_vote["h1"].is_party_line(), Some(true));
        assert_eq!(by_vote["h2"].is_party_line(), Some(false));
        assert!(by_vote["h3"].is_abstain());
        assert_eq!(by_vote["h3"].is_party_line(), None);
    }

    #[test]
    fn test_lis_keyed_ballots_join_and_unknowns_skipped() {
        let mut senator = legislator("X100", Chamber::Senate, Party::Republican, Party::Republican);
        senator.lis_id = Some("S999".to_string());
        let nomination = nomination_vote("s1", 1, "2025-02-01", "Jane Doe, of Texas");
        let ballots = vec![
            ballot("s1", "S999", Position::Yea),
            ballot("s1", "NOBODY", Position::Yea),
            ballot("s404", "X100", Position::Yea),
        ];
        let classified = classify_ballots(&[nomination], &ballots, &[senator], |_| {
            Some(Party::Republican)
        });
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].legislator_id, "X100");
        assert_eq!(classified[0].classification, Classification::PartyLine);
    }
}

//! Sponsor party resolution.
//!
//! The sponsor party is the party credited with advancing a vote. Rules are
//! applied in priority order and the first that applies decides:
//!
//! 1. Amendment with a sponsor: the amendment sponsor's registered party.
//! 2. Amendment without a sponsor: the majority party of the session in effect.
//! 3. Nomination, leadership, quorum or procedural votes: the session majority.
//! 4. Cloture on a nomination: the session majority.
//! 5. Anything else: the registered party of the bill's sponsor.
//!
//! When a rule applies but its data is missing the result is
//! [`SponsorResolution::Undefined`]; later rules are never consulted as a guess.

use std::fmt;

use rollcall_types::{Party, VoteCategory, VoteEvent};
use serde::Serialize;

use crate::snapshot::Snapshot;

/// Which rule produced a resolved sponsor party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorBasis {
    AmendmentSponsor,
    AmendmentMajority,
    CategoryMajority,
    ClotureMajority,
    BillSponsor,
}

/// Why no sponsor party could be attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "id", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No curated session covers the vote's chamber and date.
    NoCoveringSession,
    /// The sponsor id is not in the roster.
    UnknownSponsor(String),
    /// The vote names a bill the store does not have.
    UnknownBill(String),
    /// The bill has no sponsor recorded.
    NoBillSponsor(String),
    /// A bill-category vote with no bill attached.
    NoBill,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCoveringSession => write!(f, "no congress session covers the vote date"),
            Self::UnknownSponsor(id) => write!(f, "sponsor {} not in roster", id),
            Self::UnknownBill(id) => write!(f, "bill {} not found", id),
            Self::NoBillSponsor(id) => write!(f, "bill {} has no sponsor", id),
            Self::NoBill => write!(f, "vote has no bill, amendment, or nomination"),
        }
    }
}

/// Outcome of sponsor party resolution for one vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SponsorResolution {
    Resolved { party: Party, basis: SponsorBasis },
    Undefined { reason: UnresolvedReason },
}

impl SponsorResolution {
    pub fn party(&self) -> Option<&Party> {
        match self {
            Self::Resolved { party, .. } => Some(party),
            Self::Undefined { .. } => None,
        }
    }

    pub fn into_party(self) -> Option<Party> {
        match self {
            Self::Resolved { party, .. } => Some(party),
            Self::Undefined { .. } => None,
        }
    }

    fn undefined(reason: UnresolvedReason) -> Self {
        Self::Undefined { reason }
    }
}

fn is_majority_category(category: &VoteCategory) -> bool {
    matches!(
        category,
        VoteCategory::Leadership | VoteCategory::Quorum | VoteCategory::Procedural
    )
}

/// Resolve the party credited with advancing `vote`.
pub fn resolve_sponsor_party(vote: &VoteEvent, snapshot: &Snapshot) -> SponsorResolution {
    let resolution = resolve(vote, snapshot);
    if let SponsorResolution::Undefined { reason } = &resolution {
        tracing::warn!("vote {}: sponsor party unresolved ({})", vote.vote_id, reason);
    }
    resolution
}

fn resolve(vote: &VoteEvent, snapshot: &Snapshot) -> SponsorResolution {
    // Nominations have no sponsor, whatever bill or amendment they carry.
    if vote.category == VoteCategory::Nomination {
        return session_majority(vote, snapshot, SponsorBasis::CategoryMajority);
    }

    if let Some(amendment_id) = vote.amendment_id.as_deref().filter(|a| !a.is_empty()) {
        let sponsor_id = snapshot
            .amendment(amendment_id)
            .and_then(|a| a.sponsor_id.as_deref())
            .filter(|s| !s.is_empty());
        return match sponsor_id {
            Some(sponsor_id) => sponsor_party(snapshot, sponsor_id, SponsorBasis::AmendmentSponsor),
            None => session_majority(vote, snapshot, SponsorBasis::AmendmentMajority),
        };
    }

    if is_majority_category(&vote.category) {
        return session_majority(vote, snapshot, SponsorBasis::CategoryMajority);
    }

    if vote.category == VoteCategory::Cloture
        && vote.nomination_title.as_deref().is_some_and(|t| !t.is_empty())
    {
        return session_majority(vote, snapshot, SponsorBasis::ClotureMajority);
    }

    let Some(bill_id) = vote.bill_id.as_deref().filter(|b| !b.is_empty()) else {
        return SponsorResolution::undefined(UnresolvedReason::NoBill);
    };
    let Some(bill) = snapshot.bill(bill_id) else {
        return SponsorResolution::undefined(UnresolvedReason::UnknownBill(bill_id.to_string()));
    };
    match bill.sponsor_id.as_deref().filter(|s| !s.is_empty()) {
        Some(sponsor_id) => sponsor_party(snapshot, sponsor_id, SponsorBasis::BillSponsor),
        None => SponsorResolution::undefined(UnresolvedReason::NoBillSponsor(bill_id.to_string())),
    }
}

fn sponsor_party(snapshot: &Snapshot, sponsor_id: &str, basis: SponsorBasis) -> SponsorResolution {
    match snapshot.sponsor(sponsor_id) {
        Some(sponsor) => SponsorResolution::Resolved {
            party: sponsor.party.clone(),
            basis,
        },
        None => SponsorResolution::undefined(UnresolvedReason::UnknownSponsor(
            sponsor_id.to_string(),
        )),
    }
}

fn session_majority(vote: &VoteEvent, snapshot: &Snapshot, basis: SponsorBasis) -> SponsorResolution {
    match snapshot
        .sessions()
        .majority_party(vote.chamber, vote.date.date())
    {
        Some(party) => SponsorResolution::Resolved {
            party: party.clone(),
            basis,
        },
        None => SponsorResolution::undefined(UnresolvedReason::NoCoveringSession),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::*;
    use crate::snapshot::SnapshotVersion;
    use rollcall_types::{Chamber, Legislator, VoteEvent};

    fn democrat() -> Legislator {
        legislator("D1", Chamber::House, Party::Democrat, Party::Democrat)
    }

    fn independent() -> Legislator {
        legislator("I1", Chamber::Senate, Party::Independent, Party::Democrat)
    }

    fn snapshot_with(votes: Vec<VoteEvent>) -> Snapshot {
        let dem = democrat();
        let ind = independent();
        Snapshot::from_parts(
            SnapshotVersion::default(),
            vec![dem.clone(), ind.clone()],
            vec![
                bill("hr22-119", Some(&dem)),
                bill("s5-119", Some(&ind)),
                bill("hr9-119", None),
            ],
            vec![
                amendment("hamdt1-119", "hr22-119", Some(&ind)),
                amendment("hamdt2-119", "hr22-119", None),
            ],
            votes,
            vec![],
            sessions_119(),
        )
    }

    fn resolve_one(vote: VoteEvent) -> SponsorResolution {
        let snapshot = snapshot_with(vec![vote.clone()]);
        resolve_sponsor_party(&vote, &snapshot)
    }

    #[test]
    fn test_bill_vote_uses_sponsor_registered_party() {
        let resolution = resolve_one(bill_vote("h1", 1, "2025-03-01", "hr22-119"));
        assert_eq!(
            resolution,
            SponsorResolution::Resolved {
                party: Party::Democrat,
                basis: SponsorBasis::BillSponsor
            }
        );
    }

    #[test]
    fn test_independent_sponsor_is_not_caucus() {
        let resolution = resolve_one(bill_vote("s1", 1, "2025-03-01", "s5-119"));
        assert_eq!(resolution.party(), Some(&Party::Independent));
    }

    #[test]
    fn test_amendment_sponsor_wins_over_bill_sponsor() {
        let mut vote = bill_vote("h2", 2, "2025-03-01", "hr22-119");
        vote.amendment_id = Some("hamdt1-119".to_string());
        assert_eq!(
            resolve_one(vote),
            SponsorResolution::Resolved {
                party: Party::Independent,
                basis: SponsorBasis::AmendmentSponsor
            }
        );
    }

    #[test]
    fn test_unsponsored_amendment_falls_back_to_majority() {
        let mut vote = bill_vote("h3", 3, "2025-03-01", "hr22-119");
        vote.amendment_id = Some("hamdt2-119".to_string());
        assert_eq!(
            resolve_one(vote),
            SponsorResolution::Resolved {
                party: Party::Republican,
                basis: SponsorBasis::AmendmentMajority
            }
        );
    }

    #[test]
    fn test_missing_amendment_row_falls_back_to_majority() {
        let mut vote = bill_vote("h4", 4, "2025-03-01", "hr22-119");
        vote.amendment_id = Some("hamdt99-119".to_string());
        assert_eq!(resolve_one(vote).party(), Some(&Party::Republican));
    }

    #[test]
    fn test_nomination_uses_majority_regardless_of_bill() {
        let mut vote = nomination_vote("s2", 2, "2025-02-01", "Jane Doe, of Texas");
        vote.bill_id = Some("hr22-119".to_string());
        assert_eq!(
            resolve_one(vote.clone()),
            SponsorResolution::Resolved {
                party: Party::Republican,
                basis: SponsorBasis::CategoryMajority
            }
        );

        // An independent-sponsored amendment does not change the answer either.
        vote.amendment_id = Some("hamdt1-119".to_string());
        assert_eq!(
            resolve_one(vote),
            SponsorResolution::Resolved {
                party: Party::Republican,
                basis: SponsorBasis::CategoryMajority
            }
        );
    }

    #[test]
    fn test_procedural_categories_use_majority() {
        for category in [
            VoteCategory::Leadership,
            VoteCategory::Quorum,
            VoteCategory::Procedural,
        ] {
            let resolution = resolve_one(vote("s3", 3, "2025-02-01", category));
            assert_eq!(resolution.party(), Some(&Party::Republican));
        }
    }

    #[test]
    fn test_cloture_on_nomination_uses_majority() {
        let mut cloture = vote("s4", 4, "2025-02-01", VoteCategory::Cloture);
        cloture.nomination_title = Some("Jane Doe, of Texas".to_string());
        assert_eq!(
            resolve_one(cloture),
            SponsorResolution::Resolved {
                party: Party::Republican,
                basis: SponsorBasis::ClotureMajority
            }
        );
    }

    #[test]
    fn test_cloture_on_bill_uses_bill_sponsor() {
        let mut cloture = vote("s5", 5, "2025-02-01", VoteCategory::Cloture);
        cloture.bill_id = Some("hr22-119".to_string());
        assert_eq!(resolve_one(cloture).party(), Some(&Party::Democrat));
    }

    #[test]
    fn test_no_session_is_undefined() {
        let vote = nomination_vote("s6", 6, "2020-02-01", "Old Nominee");
        assert_eq!(
            resolve_one(vote),
            SponsorResolution::Undefined {
                reason: UnresolvedReason::NoCoveringSession
            }
        );
    }

    #[test]
    fn test_missing_bill_data_is_undefined() {
        assert_eq!(
            resolve_one(bill_vote("h5", 5, "2025-03-01", "hr9-119")),
            SponsorResolution::Undefined {
                reason: UnresolvedReason::NoBillSponsor("hr9-119".to_string())
            }
        );
        assert_eq!(
            resolve_one(bill_vote("h6", 6, "2025-03-01", "hr404-119")),
            SponsorResolution::Undefined {
                reason: UnresolvedReason::UnknownBill("hr404-119".to_string())
            }
        );
        assert_eq!(
            resolve_one(vote("h7", 7, "2025-03-01", VoteCategory::Bill)),
            SponsorResolution::Undefined {
                reason: UnresolvedReason::NoBill
            }
        );
    }

    #[test]
    fn test_unknown_sponsor_is_undefined() {
        let dem = democrat();
        let mut orphan_bill = bill("hr7-119", Some(&dem));
        orphan_bill.sponsor_id = Some("B-GONE".to_string());
        let vote = bill_vote("h8", 8, "2025-03-01", "hr7-119");
        let snapshot = Snapshot::from_parts(
            SnapshotVersion::default(),
            vec![dem],
            vec![orphan_bill],
            vec![],
            vec![vote.clone()],
            vec![],
            sessions_119(),
        );
        assert_eq!(
            resolve_sponsor_party(&vote, &snapshot),
            SponsorResolution::Undefined {
                reason: UnresolvedReason::UnknownSponsor("B-GONE".to_string())
            }
        );
    }
}

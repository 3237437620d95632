//! Party-line analysis of congressional roll-call votes.
//!
//! Reads an immutable snapshot of legislators, bills, amendments, vote events
//! and ballots, attributes a sponsor party to each vote, classifies every
//! ballot as party-line or not, and aggregates the results per vote, per
//! legislator, and per nomination.

pub mod aggregate;
pub mod bills;
pub mod cache;
pub mod classify;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod latest;
pub mod legislators;
pub mod nomination;
pub mod sessions;
pub mod snapshot;
pub mod sponsor;
pub mod validation;

pub use rollcall_types;
pub use rollcall_types::{
    Amendment, Ballot, Bill, BillId, BillType, Chamber, CongressSession, Legislator, Party,
    Position, VoteCategory, VoteEvent,
};

pub use aggregate::{
    ChamberFilter, ClassificationCounts, LegislatorSummary, PartyBreakdown, SortOrder,
    SummaryFilter, VoteBreakdown,
};
pub use bills::{BillInformation, BillListItem, BillVoteRecord};
pub use cache::SnapshotCache;
pub use classify::{classify, Classification, ClassifiedBallot};
pub use config::{ConfigError, EngineConfig};
pub use db::{Db, DbError, StoreContents};
pub use engine::Engine;
pub use error::{Diagnostic, PartyLineError};
pub use latest::{latest_votes_only, unique_matching_field, LatestSelection, MatchingKey};
pub use legislators::{LegislatorBallot, LegislatorProfile};
pub use nomination::{GroupBy, NominationBallot, NominationGroups, NominationPartyFilter, NominationVote};
pub use sessions::{SessionTable, SessionTableError};
pub use snapshot::{SessionSource, Snapshot, SnapshotVersion};
pub use sponsor::{resolve_sponsor_party, SponsorBasis, SponsorResolution, UnresolvedReason};

//! Shared data contracts for roll-call vote analysis.
//!
//! Typed records for legislators, bills, amendments, vote events, individual
//! ballots, and congress sessions, plus the closed vocabularies (party,
//! chamber, vote category, ballot position) used to interpret them.

mod errors;
pub mod types;

pub use self::errors::ParseError;
pub use self::types::{
    Amendment, Ballot, Bill, BillId, BillType, Chamber, CongressSession, Legislator, Party,
    Position, VoteCategory, VoteEvent,
};

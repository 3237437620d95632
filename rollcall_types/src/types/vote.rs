//! Roll-call vote events and individual ballots.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Chamber;
use crate::errors::ParseError;

/// One roll-call vote, optionally tied to a bill, an amendment, or a nomination.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteEvent {
    pub vote_id: String,

    /// Roll-call number within the chamber session.
    pub vote_number: i64,

    pub bill_id: Option<String>,

    pub amendment_id: Option<String>,

    pub chamber: Chamber,

    pub date: NaiveDateTime,

    pub result: String,

    pub category: VoteCategory,

    /// Full nomination text, e.g. "Jane Doe, of Texas, to be ...".
    pub nomination_title: Option<String>,
}

/// Kind of question put to the chamber.
///
/// Unknown upstream categories are kept verbatim in `Other` and handled like
/// standard bill votes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum VoteCategory {
    Bill,
    Nomination,
    Amendment,
    Procedural,
    Cloture,
    Leadership,
    Quorum,
    Other(String),
}

impl VoteCategory {
    pub fn as_str(&self) -> &str {
        match self {
            VoteCategory::Bill => "bill",
            VoteCategory::Nomination => "nomination",
            VoteCategory::Amendment => "amendment",
            VoteCategory::Procedural => "procedural",
            VoteCategory::Cloture => "cloture",
            VoteCategory::Leadership => "leadership",
            VoteCategory::Quorum => "quorum",
            VoteCategory::Other(other) => other,
        }
    }
}

impl std::str::FromStr for VoteCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("vote category"));
        }
        Ok(match trimmed.to_lowercase().as_str() {
            "bill" | "passage" => VoteCategory::Bill,
            "nomination" => VoteCategory::Nomination,
            "amendment" => VoteCategory::Amendment,
            "procedural" => VoteCategory::Procedural,
            "cloture" => VoteCategory::Cloture,
            "leadership" => VoteCategory::Leadership,
            "quorum" => VoteCategory::Quorum,
            other => VoteCategory::Other(other.to_string()),
        })
    }
}

impl TryFrom<String> for VoteCategory {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VoteCategory> for String {
    fn from(category: VoteCategory) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for VoteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One legislator's recorded position on one vote event.
///
/// Keyed by `(vote_id, legislator_id)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub vote_id: String,

    pub legislator_id: String,

    /// Normalized position.
    pub position: Position,

    /// Raw value from the upstream feed (e.g. "Aye", "No").
    pub original_position: String,
}

/// Normalized ballot position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    Yea,
    Nay,
    Present,
    NotVoting,
    Other(String),
}

impl Position {
    pub fn as_str(&self) -> &str {
        match self {
            Position::Yea => "Yea",
            Position::Nay => "Nay",
            Position::Present => "Present",
            Position::NotVoting => "Not Voting",
            Position::Other(other) => other,
        }
    }

    /// Anything other than Yea or Nay.
    pub fn is_abstain(&self) -> bool {
        !matches!(self, Position::Yea | Position::Nay)
    }
}

impl std::str::FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("position"));
        }
        Ok(match trimmed.to_lowercase().as_str() {
            "yea" => Position::Yea,
            "nay" => Position::Nay,
            "present" => Position::Present,
            "not voting" => Position::NotVoting,
            _ => Position::Other(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for Position {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.as_str().to_string()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

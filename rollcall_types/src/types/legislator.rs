//! Legislator records and the party / chamber vocabularies.

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// A member of Congress as recorded by the upstream roster.
///
/// `party` is the registered party; `caucus` is the party the member actually
/// conferences with. The two differ for independents, and party-line
/// classification always uses `caucus`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Legislator {
    /// Primary key referenced by ballots.
    pub id: String,

    /// Bioguide identifier, referenced by bill and amendment sponsors.
    pub bioguide_id: String,

    /// Senate LIS identifier. Senate nomination feeds key ballots by this id.
    pub lis_id: Option<String>,

    pub name: String,

    /// Two-letter state code (uppercase).
    pub state: String,

    pub district: String,

    /// Senator or representative.
    pub term_type: Chamber,

    /// Registered party affiliation.
    pub party: Party,

    /// Party the legislator caucuses with.
    pub caucus: Party,

    pub url: Option<String>,

    pub address: Option<String>,

    pub phone: Option<String>,
}

impl Legislator {
    /// True when the legislator is recorded under `id` either as the primary
    /// key or as the Senate LIS id.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.lis_id.as_deref() == Some(id)
    }
}

/// Political party code.
///
/// Serialized as the single-letter upstream code ("D", "R", "I"); any other
/// code is preserved verbatim in `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Party {
    Democrat,
    Republican,
    Independent,
    Other(String),
}

impl Party {
    /// Upstream single-letter (or verbatim) code.
    pub fn code(&self) -> &str {
        match self {
            Party::Democrat => "D",
            Party::Republican => "R",
            Party::Independent => "I",
            Party::Other(code) => code,
        }
    }

    /// True for the two parties that organize a chamber.
    pub fn is_major(&self) -> bool {
        matches!(self, Party::Democrat | Party::Republican)
    }
}

impl std::str::FromStr for Party {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("party"));
        }
        Ok(match trimmed.to_lowercase().as_str() {
            "d" | "dem" | "democrat" | "democratic" => Party::Democrat,
            "r" | "rep" | "republican" => Party::Republican,
            "i" | "ind" | "independent" => Party::Independent,
            _ => Party::Other(trimmed.to_uppercase()),
        })
    }
}

impl TryFrom<String> for Party {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Party> for String {
    fn from(party: Party) -> Self {
        party.code().to_string()
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Congressional chamber.
///
/// Serialized with the roster's term-type codes: `sen` and `rep`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Chamber {
    /// US Senate.
    Senate,

    /// US House of Representatives.
    House,
}

impl Chamber {
    pub fn code(&self) -> &'static str {
        match self {
            Chamber::Senate => "sen",
            Chamber::House => "rep",
        }
    }
}

impl std::str::FromStr for Chamber {
    type Err = ParseError;

    /// Accepts roster term types (`sen`, `rep`), vote-feed chamber letters
    /// (`s`, `h`), and the full names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err(ParseError::Empty("chamber")),
            "sen" | "s" | "senate" | "senator" => Ok(Chamber::Senate),
            "rep" | "h" | "house" | "representative" => Ok(Chamber::House),
            _ => Err(ParseError::Unrecognized {
                kind: "chamber",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Chamber {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Chamber> for String {
    fn from(chamber: Chamber) -> Self {
        chamber.code().to_string()
    }
}

impl std::fmt::Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Chamber::Senate => "senate",
                Chamber::House => "house",
            }
        )
    }
}

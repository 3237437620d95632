//! Bills, amendments, and composite bill identifiers.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// A bill or resolution that received at least one recorded vote.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Composite key of type, number, and congress (e.g. "hr22-119").
    pub bill_id: String,

    pub bill_type: String,

    pub bill_number: String,

    pub title: String,

    pub short_title: Option<String>,

    /// Bioguide id of the sponsoring legislator.
    pub sponsor_id: Option<String>,

    pub status: String,

    pub status_at: NaiveDateTime,

    pub congress: String,
}

impl Bill {
    /// Short title when present, otherwise the full title.
    pub fn display_title(&self) -> &str {
        self.short_title.as_deref().unwrap_or(&self.title)
    }

    /// Parses `bill_id` into its components.
    pub fn parsed_id(&self) -> Result<BillId, ParseError> {
        self.bill_id.parse()
    }
}

/// An amendment offered to a bill.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Amendment {
    pub amendment_id: String,

    pub bill_id: Option<String>,

    /// Bioguide id of the sponsoring legislator, when the amendment has one.
    pub sponsor_id: Option<String>,

    pub chamber: super::Chamber,

    pub purpose: Option<String>,
}

/// Legislative measure type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Hr,
    S,
    Hres,
    Sres,
    Hjres,
    Sjres,
    Hconres,
    Sconres,
}

impl BillType {
    pub fn code(&self) -> &'static str {
        match self {
            BillType::Hr => "hr",
            BillType::S => "s",
            BillType::Hres => "hres",
            BillType::Sres => "sres",
            BillType::Hjres => "hjres",
            BillType::Sjres => "sjres",
            BillType::Hconres => "hconres",
            BillType::Sconres => "sconres",
        }
    }
}

impl std::str::FromStr for BillType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hr" => Ok(BillType::Hr),
            "s" => Ok(BillType::S),
            "hres" => Ok(BillType::Hres),
            "sres" => Ok(BillType::Sres),
            "hjres" => Ok(BillType::Hjres),
            "sjres" => Ok(BillType::Sjres),
            "hconres" => Ok(BillType::Hconres),
            "sconres" => Ok(BillType::Sconres),
            "" => Err(ParseError::Empty("bill type")),
            _ => Err(ParseError::Unrecognized {
                kind: "bill type",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parsed composite bill identifier: `{type}{number}-{congress}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BillId {
    pub bill_type: BillType,
    pub number: u32,
    pub congress: u16,
}

fn bill_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(hconres|sconres|hjres|sjres|hres|sres|hr|s)(\d+)-(\d+)$")
            .expect("bill id pattern is valid")
    })
}

impl std::str::FromStr for BillId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ParseError::Empty("bill id"));
        }
        let unrecognized = || ParseError::Unrecognized {
            kind: "bill id",
            value: s.to_string(),
        };
        let caps = bill_id_pattern()
            .captures(&normalized)
            .ok_or_else(&unrecognized)?;
        Ok(BillId {
            bill_type: caps[1].parse()?,
            number: caps[2].parse().map_err(|_| unrecognized())?,
            congress: caps[3].parse().map_err(|_| unrecognized())?,
        })
    }
}

impl std::fmt::Display for BillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}-{}", self.bill_type, self.number, self.congress)
    }
}

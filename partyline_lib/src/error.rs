//! Error types for the library layer.

use std::fmt;

use chrono::NaiveDate;
use rollcall_types::Chamber;
use serde::Serialize;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::sessions::SessionTableError;

/// Errors produced by the library layer.
///
/// Only conditions that stop a query are errors. Data-quality conditions the
/// engine can work around are reported as [`Diagnostic`] values instead.
#[derive(Debug)]
pub enum PartyLineError {
    /// The backing data store could not be read. Retrying may succeed once
    /// the store is reachable again.
    UpstreamDataUnavailable(DbError),
    /// A requested record does not exist in the snapshot.
    NotFound { kind: &'static str, id: String },
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The curated congress session table could not be loaded.
    SessionTable(SessionTableError),
    /// The configuration file could not be loaded.
    Config(ConfigError),
}

impl PartyLineError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// True for failures that originate outside the engine and may clear on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamDataUnavailable(_))
    }
}

impl fmt::Display for PartyLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpstreamDataUnavailable(e) => write!(f, "Upstream data unavailable: {}", e),
            Self::NotFound { kind, id } => write!(f, "{} '{}' not found", kind, id),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::SessionTable(e) => write!(f, "Session table error: {}", e),
            Self::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for PartyLineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UpstreamDataUnavailable(e) => Some(e),
            Self::SessionTable(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbError> for PartyLineError {
    fn from(e: DbError) -> Self {
        Self::UpstreamDataUnavailable(e)
    }
}

impl From<SessionTableError> for PartyLineError {
    fn from(e: SessionTableError) -> Self {
        Self::SessionTable(e)
    }
}

impl From<ConfigError> for PartyLineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// A non-fatal data-quality condition found while answering a query.
///
/// Each is logged with `tracing` where it is detected; integrity reports
/// collect them so callers can show "unknown" instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No sponsor party could be attributed to a vote; its ballots are unclassifiable.
    UnresolvedSponsorParty { vote_id: String, reason: String },
    /// More than one session of a chamber covers a date; the most recently
    /// started one was used.
    AmbiguousCongressSession {
        chamber: Chamber,
        date: NaiveDate,
        candidates: Vec<String>,
        chosen: String,
    },
    /// Two session ranges of one chamber share at least one day.
    OverlappingSessions {
        chamber: Chamber,
        first: String,
        second: String,
    },
    /// Several roll calls on one subject share the latest date; the highest
    /// vote number was kept.
    UnresolvedLatestVoteTie {
        key: String,
        chosen: String,
        discarded: Vec<String>,
    },
    /// A percentage had a zero denominator and was left undefined.
    UndefinedRatio { legislator_id: String },
    /// A ballot references a legislator missing from the roster.
    UnknownBallotLegislator {
        vote_id: String,
        legislator_id: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedSponsorParty { vote_id, reason } => {
                write!(f, "vote {}: sponsor party unresolved ({})", vote_id, reason)
            }
            Self::AmbiguousCongressSession {
                chamber,
                date,
                candidates,
                chosen,
            } => write!(
                f,
                "{} {}: {} sessions match ({}), using {}",
                chamber,
                date,
                candidates.len(),
                candidates.join(", "),
                chosen
            ),
            Self::OverlappingSessions {
                chamber,
                first,
                second,
            } => write!(f, "{}: sessions {} and {} overlap", chamber, first, second),
            Self::UnresolvedLatestVoteTie {
                key,
                chosen,
                discarded,
            } => write!(
                f,
                "subject '{}': latest date shared by {} votes, kept {} over {}",
                key,
                discarded.len() + 1,
                chosen,
                discarded.join(", ")
            ),
            Self::UndefinedRatio { legislator_id } => {
                write!(f, "legislator {}: no classified ballots", legislator_id)
            }
            Self::UnknownBallotLegislator {
                vote_id,
                legislator_id,
            } => write!(
                f,
                "vote {}: ballot from unknown legislator {}",
                vote_id, legislator_id
            ),
        }
    }
}

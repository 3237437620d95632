//! Congress session boundaries and majority-party lookup.
//!
//! The session table is externally curated reference data. It comes either
//! from the store's `congress_sessions` table or from the YAML file compiled in
//! from `seed_data/congress_sessions.yml`, and the engine never derives it.

use chrono::NaiveDate;
use rollcall_types::{Chamber, CongressSession, Party};
use serde::Deserialize;
use thiserror::Error;

use crate::error::Diagnostic;

/// Error types for the curated session table.
#[derive(Error, Debug)]
pub enum SessionTableError {
    #[error("Failed to parse session table YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Failed to read session table file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session {0} ends before it starts")]
    InvertedRange(String),
    #[error("Duplicate session entry: {0}")]
    Duplicate(String),
}

/// Top-level structure for the session table YAML file.
#[derive(Deserialize, Debug)]
struct SessionTableFile {
    sessions: Vec<CongressSession>,
}

/// Short label used in logs and diagnostics, e.g. `119-1 (senate)`.
pub fn session_label(session: &CongressSession) -> String {
    format!("{}-{} ({})", session.congress, session.session, session.chamber)
}

/// Parse and validate a session table from YAML content.
///
/// Rejects inverted ranges and duplicate (congress, chamber, session) keys.
/// Overlapping ranges are accepted; see [`find_session_overlaps`].
pub fn parse_congress_sessions(yaml_content: &str) -> Result<Vec<CongressSession>, SessionTableError> {
    let file: SessionTableFile = serde_yml::from_str(yaml_content)?;

    let mut seen = std::collections::HashSet::new();
    for session in &file.sessions {
        if session.end_date.is_some_and(|end| end < session.start_date) {
            return Err(SessionTableError::InvertedRange(session_label(session)));
        }
        if !seen.insert((session.congress, session.chamber, session.session)) {
            return Err(SessionTableError::Duplicate(session_label(session)));
        }
    }

    Ok(file.sessions)
}

/// Load the session table from embedded YAML at compile time.
pub fn load_congress_sessions() -> Result<Vec<CongressSession>, SessionTableError> {
    let yaml_content = include_str!("../../seed_data/congress_sessions.yml");
    parse_congress_sessions(yaml_content)
}

/// Load a session table from a YAML file on disk.
pub fn load_congress_sessions_file(
    path: impl AsRef<std::path::Path>,
) -> Result<Vec<CongressSession>, SessionTableError> {
    let content = std::fs::read_to_string(path)?;
    parse_congress_sessions(&content)
}

/// Pairs of same-chamber sessions whose date ranges intersect.
pub fn find_session_overlaps(sessions: &[CongressSession]) -> Vec<Diagnostic> {
    let mut overlaps = Vec::new();
    for (i, first) in sessions.iter().enumerate() {
        for second in &sessions[i + 1..] {
            if first.overlaps(second) {
                overlaps.push(Diagnostic::OverlappingSessions {
                    chamber: first.chamber,
                    first: session_label(first),
                    second: session_label(second),
                });
            }
        }
    }
    overlaps
}

/// Read-only session table with date lookup.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    sessions: Vec<CongressSession>,
}

impl SessionTable {
    pub fn new(sessions: Vec<CongressSession>) -> Self {
        for overlap in find_session_overlaps(&sessions) {
            tracing::warn!("Session table integrity: {}", overlap);
        }
        Self { sessions }
    }

    pub fn sessions(&self) -> &[CongressSession] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Every session of `chamber` whose range covers `date`.
    pub fn covering(&self, chamber: Chamber, date: NaiveDate) -> Vec<&CongressSession> {
        self.sessions
            .iter()
            .filter(|s| s.covers(chamber, date))
            .collect()
    }

    /// The session in effect for `chamber` on `date`.
    ///
    /// When several sessions cover the date (a data-integrity problem), the
    /// most recently started one wins, with congress and session number as
    /// further tie-breaks, and a warning is logged.
    pub fn session_for(&self, chamber: Chamber, date: NaiveDate) -> Option<&CongressSession> {
        let candidates = self.covering(chamber, date);
        let chosen = candidates
            .iter()
            .copied()
            .max_by_key(|s| (s.start_date, s.congress, s.session))?;

        if candidates.len() > 1 {
            let diagnostic = ambiguity(chamber, date, &candidates, chosen);
            tracing::warn!("{}", diagnostic);
        }
        Some(chosen)
    }

    /// Majority party of the session in effect for `chamber` on `date`.
    pub fn majority_party(&self, chamber: Chamber, date: NaiveDate) -> Option<&Party> {
        self.session_for(chamber, date).map(|s| &s.majority_party)
    }

    /// Ambiguity diagnostic for `(chamber, date)`, if more than one session covers it.
    pub fn ambiguity_at(&self, chamber: Chamber, date: NaiveDate) -> Option<Diagnostic> {
        let candidates = self.covering(chamber, date);
        if candidates.len() < 2 {
            return None;
        }
        let chosen = candidates
            .iter()
            .copied()
            .max_by_key(|s| (s.start_date, s.congress, s.session))?;
        Some(ambiguity(chamber, date, &candidates, chosen))
    }
}

fn ambiguity(
    chamber: Chamber,
    date: NaiveDate,
    candidates: &[&CongressSession],
    chosen: &CongressSession,
) -> Diagnostic {
    Diagnostic::AmbiguousCongressSession {
        chamber,
        date,
        candidates: candidates.iter().map(|s| session_label(s)).collect(),
        chosen: session_label(chosen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_embedded_table_loads_without_overlaps() {
        let sessions = load_congress_sessions().unwrap();
        assert!(!sessions.is_empty());
        assert!(find_session_overlaps(&sessions).is_empty());
    }

    #[test]
    fn test_embedded_table_majorities() {
        let table = SessionTable::new(load_congress_sessions().unwrap());
        assert_eq!(
            table.majority_party(Chamber::Senate, date(2024, 6, 1)),
            Some(&Party::Democrat)
        );
        assert_eq!(
            table.majority_party(Chamber::Senate, date(2025, 2, 1)),
            Some(&Party::Republican)
        );
        assert_eq!(
            table.majority_party(Chamber::House, date(2023, 2, 1)),
            Some(&Party::Republican)
        );
        // Open-ended current session.
        assert_eq!(
            table.majority_party(Chamber::Senate, date(2026, 10, 1)),
            Some(&Party::Republican)
        );
        assert_eq!(table.majority_party(Chamber::House, date(1999, 1, 1)), None);
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let yaml = r#"
sessions:
  - congress: 119
    chamber: sen
    session: 1
    majority_party: R
    start_date: 2025-06-01
    end_date: 2025-01-01
"#;
        assert!(matches!(
            parse_congress_sessions(yaml),
            Err(SessionTableError::InvertedRange(_))
        ));
    }

    #[test]
    fn test_parse_rejects_duplicate_key() {
        let yaml = r#"
sessions:
  - congress: 119
    chamber: rep
    session: 1
    majority_party: R
    start_date: 2025-01-03
  - congress: 119
    chamber: h
    session: 1
    majority_party: R
    start_date: 2025-01-03
"#;
        assert!(matches!(
            parse_congress_sessions(yaml),
            Err(SessionTableError::Duplicate(_))
        ));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            parse_congress_sessions("sessions: [unclosed"),
            Err(SessionTableError::YamlParse(_))
        ));
    }

    #[test]
    fn test_overlap_picks_most_recent_start() {
        let yaml = r#"
sessions:
  - congress: 118
    chamber: sen
    session: 2
    majority_party: D
    start_date: 2024-01-03
    end_date: 2025-01-10
  - congress: 119
    chamber: sen
    session: 1
    majority_party: R
    start_date: 2025-01-03
"#;
        let sessions = parse_congress_sessions(yaml).unwrap();
        assert_eq!(find_session_overlaps(&sessions).len(), 1);

        let table = SessionTable::new(sessions);
        let overlap_day = date(2025, 1, 5);
        assert_eq!(table.covering(Chamber::Senate, overlap_day).len(), 2);
        assert_eq!(
            table.majority_party(Chamber::Senate, overlap_day),
            Some(&Party::Republican)
        );
        match table.ambiguity_at(Chamber::Senate, overlap_day) {
            Some(Diagnostic::AmbiguousCongressSession {
                candidates, chosen, ..
            }) => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(chosen, "119-1 (senate)");
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
        assert!(table.ambiguity_at(Chamber::Senate, date(2024, 6, 1)).is_none());
    }
}

//! Immutable, indexed copy of one state of the vote store.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use rollcall_types::{Amendment, Ballot, Bill, CongressSession, Legislator, VoteEvent};
use serde::Serialize;

use crate::db::{Db, StoreContents};
use crate::error::{Diagnostic, PartyLineError};
use crate::sessions::{self, SessionTable};

/// Marker for the ingestion run a snapshot was read from (`site_meta.last_update`).
///
/// Derived data cached against one version is invalid for any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SnapshotVersion(Option<String>);

impl SnapshotVersion {
    pub fn new(marker: Option<String>) -> Self {
        Self(marker)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(marker) => f.write_str(marker),
            None => f.write_str("unversioned"),
        }
    }
}

/// Where the snapshot's session table should come from.
#[derive(Debug, Clone, Default)]
pub enum SessionSource<'a> {
    /// Store rows if any, otherwise the compiled-in table.
    #[default]
    StoreOrEmbedded,
    /// A curated YAML file that replaces both.
    File(&'a Path),
}

/// Read-only view of legislators, bills, amendments, votes, ballots and
/// congress sessions, with the lookups the engine needs.
///
/// Vote events are kept in date-ascending order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    version: SnapshotVersion,
    legislators: Vec<Legislator>,
    legislator_by_id: HashMap<String, usize>,
    legislator_by_lis: HashMap<String, usize>,
    legislator_by_bioguide: HashMap<String, usize>,
    bills: Vec<Bill>,
    bill_by_id: HashMap<String, usize>,
    amendments: HashMap<String, Amendment>,
    vote_events: Vec<VoteEvent>,
    vote_by_id: HashMap<String, usize>,
    ballots: Vec<Ballot>,
    ballots_by_vote: HashMap<String, Vec<usize>>,
    ballots_by_legislator: HashMap<String, Vec<usize>>,
    sessions: SessionTable,
    orphan_ballots: Vec<Diagnostic>,
}

impl Snapshot {
    /// Read the whole store and index it.
    pub fn load(db: &Db) -> Result<Self, PartyLineError> {
        Self::load_with(db, SessionSource::StoreOrEmbedded)
    }

    pub fn load_with(db: &Db, session_source: SessionSource<'_>) -> Result<Self, PartyLineError> {
        let mut contents = db.read_contents()?;
        contents.sessions = match session_source {
            SessionSource::File(path) => sessions::load_congress_sessions_file(path)?,
            SessionSource::StoreOrEmbedded if contents.sessions.is_empty() => {
                tracing::debug!("congress_sessions table empty, using embedded session table");
                sessions::load_congress_sessions()?
            }
            SessionSource::StoreOrEmbedded => contents.sessions,
        };
        let snapshot = Self::from_contents(contents);
        tracing::info!(
            "Loaded snapshot {}: {} legislators, {} bills, {} votes, {} ballots",
            snapshot.version,
            snapshot.legislators.len(),
            snapshot.bills.len(),
            snapshot.vote_events.len(),
            snapshot.ballots.len()
        );
        Ok(snapshot)
    }

    pub fn from_contents(contents: StoreContents) -> Self {
        Self::from_parts(
            SnapshotVersion::new(contents.last_update),
            contents.legislators,
            contents.bills,
            contents.amendments,
            contents.vote_events,
            contents.ballots,
            contents.sessions,
        )
    }

    /// Build a snapshot from records supplied by any data source.
    pub fn from_parts(
        version: SnapshotVersion,
        legislators: Vec<Legislator>,
        bills: Vec<Bill>,
        amendments: Vec<Amendment>,
        mut vote_events: Vec<VoteEvent>,
        ballots: Vec<Ballot>,
        sessions: Vec<CongressSession>,
    ) -> Self {
        let mut legislator_by_id = HashMap::new();
        let mut legislator_by_lis = HashMap::new();
        let mut legislator_by_bioguide = HashMap::new();
        for (idx, legislator) in legislators.iter().enumerate() {
            legislator_by_id.insert(legislator.id.clone(), idx);
            legislator_by_bioguide.insert(legislator.bioguide_id.clone(), idx);
            if let Some(lis) = legislator.lis_id.as_deref().filter(|l| !l.is_empty()) {
                legislator_by_lis.insert(lis.to_string(), idx);
            }
        }

        let bill_by_id = bills
            .iter()
            .enumerate()
            .map(|(idx, bill)| (bill.bill_id.clone(), idx))
            .collect();

        let amendments = amendments
            .into_iter()
            .map(|a| (a.amendment_id.clone(), a))
            .collect();

        vote_events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.vote_number.cmp(&b.vote_number))
                .then_with(|| a.vote_id.cmp(&b.vote_id))
        });
        let vote_by_id = vote_events
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.vote_id.clone(), idx))
            .collect();

        let mut snapshot = Self {
            version,
            legislators,
            legislator_by_id,
            legislator_by_lis,
            legislator_by_bioguide,
            bills,
            bill_by_id,
            amendments,
            vote_events,
            vote_by_id,
            ballots: Vec::new(),
            ballots_by_vote: HashMap::new(),
            ballots_by_legislator: HashMap::new(),
            sessions: SessionTable::new(sessions),
            orphan_ballots: Vec::new(),
        };
        snapshot.index_ballots(ballots);
        snapshot
    }

    fn index_ballots(&mut self, ballots: Vec<Ballot>) {
        for (idx, ballot) in ballots.iter().enumerate() {
            self.ballots_by_vote
                .entry(ballot.vote_id.clone())
                .or_default()
                .push(idx);

            match self.ballot_legislator(ballot) {
                Some(legislator) => {
                    let canonical = legislator.id.clone();
                    self.ballots_by_legislator
                        .entry(canonical)
                        .or_default()
                        .push(idx);
                }
                None => {
                    let diagnostic = Diagnostic::UnknownBallotLegislator {
                        vote_id: ballot.vote_id.clone(),
                        legislator_id: ballot.legislator_id.clone(),
                    };
                    tracing::warn!("{}", diagnostic);
                    self.orphan_ballots.push(diagnostic);
                }
            }
        }
        self.ballots = ballots;
    }

    pub fn version(&self) -> &SnapshotVersion {
        &self.version
    }

    pub fn legislators(&self) -> &[Legislator] {
        &self.legislators
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// All vote events, date ascending.
    pub fn vote_events(&self) -> &[VoteEvent] {
        &self.vote_events
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Ballots whose legislator is not in the roster.
    pub fn orphan_ballots(&self) -> &[Diagnostic] {
        &self.orphan_ballots
    }

    pub fn legislator(&self, id: &str) -> Option<&Legislator> {
        self.legislator_by_id
            .get(id)
            .map(|&idx| &self.legislators[idx])
    }

    /// Legislator that cast `ballot`, joined on id and then on LIS id.
    pub fn ballot_legislator(&self, ballot: &Ballot) -> Option<&Legislator> {
        self.legislator_by_id
            .get(&ballot.legislator_id)
            .or_else(|| self.legislator_by_lis.get(&ballot.legislator_id))
            .map(|&idx| &self.legislators[idx])
    }

    /// Sponsor lookup for bills and amendments, keyed by bioguide id.
    pub fn sponsor(&self, sponsor_id: &str) -> Option<&Legislator> {
        self.legislator_by_bioguide
            .get(sponsor_id)
            .or_else(|| self.legislator_by_id.get(sponsor_id))
            .map(|&idx| &self.legislators[idx])
    }

    pub fn bill(&self, bill_id: &str) -> Option<&Bill> {
        self.bill_by_id.get(bill_id).map(|&idx| &self.bills[idx])
    }

    pub fn amendment(&self, amendment_id: &str) -> Option<&Amendment> {
        self.amendments.get(amendment_id)
    }

    pub fn vote_event(&self, vote_id: &str) -> Option<&VoteEvent> {
        self.vote_by_id
            .get(vote_id)
            .map(|&idx| &self.vote_events[idx])
    }

    pub fn ballots_for_vote(&self, vote_id: &str) -> impl Iterator<Item = &Ballot> + '_ {
        self.ballots_by_vote
            .get(vote_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.ballots[idx])
    }

    /// Ballots cast by the legislator with canonical id `legislator_id`,
    /// however the source keyed them.
    pub fn ballots_for_legislator(
        &self,
        legislator_id: &str,
    ) -> impl Iterator<Item = &Ballot> + '_ {
        self.ballots_by_legislator
            .get(legislator_id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.ballots[idx])
    }

    pub fn has_ballots(&self, legislator_id: &str) -> bool {
        self.ballots_by_legislator
            .get(legislator_id)
            .is_some_and(|b| !b.is_empty())
    }

    /// Vote events on `bill_id`, date ascending.
    pub fn votes_for_bill<'a>(&'a self, bill_id: &'a str) -> impl Iterator<Item = &'a VoteEvent> {
        self.vote_events
            .iter()
            .filter(move |v| v.bill_id.as_deref() == Some(bill_id))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use rollcall_types::{Chamber, Party, Position};

    fn sample() -> Snapshot {
        let mut sanders = legislator("S313", Chamber::Senate, Party::Independent, Party::Democrat);
        sanders.id = "sanders".to_string();
        sanders.lis_id = Some("S313".to_string());
        let johnson = legislator("J001", Chamber::House, Party::Republican, Party::Republican);
        let bill = bill("hr22-119", Some(&johnson));
        let votes = vec![
            bill_vote("h2", 2, "2025-04-15", "hr22-119"),
            bill_vote("h1", 1, "2025-03-01", "hr22-119"),
            nomination_vote("s1", 5, "2025-02-01", "Jane Doe, of Texas"),
        ];
        let ballots = vec![
            ballot("h1", "J001", Position::Yea),
            ballot("s1", "S313", Position::Nay),
            ballot("s1", "GHOST", Position::Yea),
        ];
        Snapshot::from_parts(
            SnapshotVersion::new(Some("2025-05-01 00:00:00".to_string())),
            vec![sanders, johnson],
            vec![bill],
            vec![],
            votes,
            ballots,
            sessions_119(),
        )
    }

    #[test]
    fn test_votes_sorted_by_date() {
        let snapshot = sample();
        let ids: Vec<&str> = snapshot
            .vote_events()
            .iter()
            .map(|v| v.vote_id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "h1", "h2"]);
        assert_eq!(snapshot.vote_event("h2").unwrap().vote_number, 2);
        assert_eq!(
            snapshot.votes_for_bill("hr22-119").map(|v| v.vote_id.as_str()).collect::<Vec<_>>(),
            vec!["h1", "h2"]
        );
    }

    #[test]
    fn test_ballot_join_falls_back_to_lis_id() {
        let snapshot = sample();
        let ballot = snapshot.ballots_for_vote("s1").next().unwrap();
        assert_eq!(snapshot.ballot_legislator(ballot).unwrap().id, "sanders");
        assert_eq!(snapshot.ballots_for_legislator("sanders").count(), 1);
        assert!(snapshot.has_ballots("sanders"));
        assert!(!snapshot.has_ballots("S313"));
    }

    #[test]
    fn test_unknown_ballot_legislator_recorded() {
        let snapshot = sample();
        assert_eq!(
            snapshot.orphan_ballots(),
            &[Diagnostic::UnknownBallotLegislator {
                vote_id: "s1".to_string(),
                legislator_id: "GHOST".to_string(),
            }]
        );
    }

    #[test]
    fn test_sponsor_lookup_by_bioguide() {
        let snapshot = sample();
        let bill = snapshot.bill("hr22-119").unwrap();
        let sponsor = snapshot.sponsor(bill.sponsor_id.as_deref().unwrap()).unwrap();
        assert_eq!(sponsor.id, "J001");
        assert!(snapshot.sponsor("nobody").is_none());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(sample().version().to_string(), "2025-05-01 00:00:00");
        assert_eq!(SnapshotVersion::default().to_string(), "unversioned");
    }

    #[test]
    fn test_load_falls_back_to_embedded_sessions() {
        let db = Db::open_in_memory().unwrap();
        db.init().unwrap();
        let snapshot = Snapshot::load(&db).unwrap();
        assert!(!snapshot.sessions().is_empty());
        assert_eq!(snapshot.version(), &SnapshotVersion::default());
        assert!(snapshot.vote_events().is_empty());
    }
}

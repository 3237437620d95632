//! Query entry point over one snapshot.
//!
//! An [`Engine`] is cheap to clone and safe to share across threads. Every
//! query borrows the snapshot immutably; the only shared mutable state is the
//! optional [`SnapshotCache`], which is internally synchronized.

use std::collections::HashMap;
use std::sync::Arc;

use rollcall_types::{Ballot, Bill, Legislator, VoteCategory, VoteEvent};

use crate::aggregate::{
    self, LegislatorSummary, PartyBreakdown, SortOrder, SummaryFilter, VoteBreakdown,
};
use crate::bills::{BillInformation, BillListItem, BillVoteRecord};
use crate::cache::SnapshotCache;
use crate::classify::{self, ClassifiedBallot};
use crate::config::EngineConfig;
use crate::db::Db;
use crate::error::{Diagnostic, PartyLineError};
use crate::latest::{self, LatestSelection};
use crate::legislators::{LegislatorBallot, LegislatorProfile};
use crate::nomination::{
    self, GroupBy, NominationBallot, NominationGroups, NominationPartyFilter, NominationVote,
};
use crate::sessions;
use crate::snapshot::{SessionSource, Snapshot, SnapshotVersion};
use crate::sponsor::{self, SponsorResolution};

#[derive(Debug, Clone)]
pub struct Engine {
    snapshot: Arc<Snapshot>,
    cache: Option<Arc<SnapshotCache>>,
}

impl Engine {
    /// Engine over `snapshot` with a private cache.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            cache: Some(Arc::new(SnapshotCache::new())),
        }
    }

    /// Engine sharing `cache` with other engines. The cache resets itself when
    /// it sees a newer snapshot.
    pub fn with_cache(snapshot: Arc<Snapshot>, cache: Arc<SnapshotCache>) -> Self {
        Self {
            snapshot,
            cache: Some(cache),
        }
    }

    pub fn without_cache(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            cache: None,
        }
    }

    /// Load a snapshot from `db`, honoring the session table and cache settings.
    pub fn open(db: &Db, config: &EngineConfig) -> Result<Self, PartyLineError> {
        let source = match config.sessions_file.as_deref() {
            Some(path) => SessionSource::File(path),
            None => SessionSource::StoreOrEmbedded,
        };
        let snapshot = Snapshot::load_with(db, source)?;
        Ok(if config.cache_enabled {
            Self::new(snapshot)
        } else {
            Self::without_cache(snapshot)
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn cache(&self) -> Option<&SnapshotCache> {
        self.cache.as_deref()
    }

    /// Version of the data every answer from this engine reflects.
    pub fn as_of(&self) -> &SnapshotVersion {
        self.snapshot.version()
    }

    // ---- Core contracts ----

    /// Only events identical to the snapshot's copy are memoized; a
    /// caller-supplied event may reuse a vote id with different fields.
    pub fn resolve_sponsor_party(&self, vote: &VoteEvent) -> SponsorResolution {
        let resolve = || sponsor::resolve_sponsor_party(vote, &self.snapshot);
        match &self.cache {
            Some(cache) if self.snapshot.vote_event(&vote.vote_id) == Some(vote) => {
                cache.sponsor_party(self.as_of(), &vote.vote_id, resolve)
            }
            _ => resolve(),
        }
    }

    /// Classify caller-supplied ballots, resolving sponsors against this snapshot.
    pub fn classify_ballots(
        &self,
        vote_events: &[VoteEvent],
        ballots: &[Ballot],
        legislators: &[Legislator],
    ) -> Vec<ClassifiedBallot> {
        classify::classify_ballots(vote_events, ballots, legislators, |vote| {
            self.resolve_sponsor_party(vote).into_party()
        })
    }

    /// Latest vote per subject among `vote_events`.
    pub fn latest_votes_only(&self, vote_events: &[VoteEvent]) -> Vec<VoteEvent> {
        latest::latest_votes_only(vote_events)
    }

    /// Latest vote per subject over the whole snapshot, memoized.
    pub fn latest_votes(&self) -> Arc<LatestSelection> {
        let select = || latest::select_latest(self.snapshot.vote_events());
        match &self.cache {
            Some(cache) => cache.latest(self.as_of(), select),
            None => Arc::new(select()),
        }
    }

    /// Party breakdown for each vote id, in request order.
    pub fn per_vote_breakdown(&self, vote_ids: &[&str]) -> Result<Vec<VoteBreakdown>, PartyLineError> {
        vote_ids
            .iter()
            .map(|id| {
                let vote = self.vote_event(id)?;
                Ok(self.breakdown_for(vote))
            })
            .collect()
    }

    /// Ranked broke-party-line summaries over the latest-vote set.
    pub fn per_legislator_summary(
        &self,
        filter: &SummaryFilter,
        order: SortOrder,
    ) -> Vec<LegislatorSummary> {
        let latest = self.latest_votes();
        let mut ballots = Vec::new();
        for vote in &latest.votes {
            ballots.extend(self.classify_vote(vote));
        }
        let mut summaries = aggregate::summarize(&ballots, self.snapshot.legislators(), filter);
        aggregate::sort_summaries(&mut summaries, order);
        summaries
    }

    /// Two-level grouping of one nomination vote's ballots.
    pub fn per_nomination_group(
        &self,
        vote_id: &str,
        group_by: GroupBy,
    ) -> Result<NominationGroups, PartyLineError> {
        let ballots = self.nomination_ballots(vote_id, NominationPartyFilter::All)?;
        Ok(nomination::group_nomination_ballots(&ballots, group_by))
    }

    // ---- Legislator views ----

    /// Legislators with at least one recorded ballot, by name.
    pub fn legislators(&self, filter: &SummaryFilter) -> Vec<Legislator> {
        let mut legislators: Vec<Legislator> = self
            .snapshot
            .legislators()
            .iter()
            .filter(|l| self.snapshot.has_ballots(&l.id) && filter.matches(l))
            .cloned()
            .collect();
        legislators.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        legislators
    }

    /// A legislator with at least one recorded ballot, by id or LIS id.
    pub fn legislator(&self, id: &str) -> Result<Legislator, PartyLineError> {
        self.snapshot
            .legislators()
            .iter()
            .find(|l| l.matches_id(id) && self.snapshot.has_ballots(&l.id))
            .cloned()
            .ok_or_else(|| PartyLineError::not_found("legislator", id))
    }

    /// Every ballot the legislator cast, newest first, including abstentions
    /// and unclassifiable ballots.
    pub fn legislator_ballots(&self, id: &str) -> Result<Vec<LegislatorBallot>, PartyLineError> {
        let legislator = self.legislator(id)?;
        let mut ballots: Vec<LegislatorBallot> = self
            .snapshot
            .ballots_for_legislator(&legislator.id)
            .filter_map(|ballot| {
                let vote = self.snapshot.vote_event(&ballot.vote_id)?;
                let sponsor = self.resolve_sponsor_party(vote);
                let classified = ClassifiedBallot::new(ballot, &legislator, sponsor.party());
                Some(LegislatorBallot::new(classified, vote))
            })
            .collect();
        ballots.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.ballot.vote_id.cmp(&a.ballot.vote_id))
        });
        Ok(ballots)
    }

    pub fn legislator_profile(&self, id: &str) -> Result<LegislatorProfile, PartyLineError> {
        let legislator = self.legislator(id)?;
        let ballots = self.legislator_ballots(&legislator.id)?;
        Ok(LegislatorProfile::new(legislator, &ballots))
    }

    // ---- Bill views ----

    /// Bills with at least one vote, newest status first.
    pub fn bills_having_votes(&self) -> Vec<BillListItem> {
        let mut vote_counts: HashMap<&str, usize> = HashMap::new();
        for vote in self.snapshot.vote_events() {
            if let Some(bill_id) = vote.bill_id.as_deref() {
                *vote_counts.entry(bill_id).or_default() += 1;
            }
        }
        let mut items: Vec<BillListItem> = self
            .snapshot
            .bills()
            .iter()
            .filter_map(|bill| {
                let count = *vote_counts.get(bill.bill_id.as_str())?;
                let sponsor = bill.sponsor_id.as_deref().and_then(|s| self.snapshot.sponsor(s));
                Some(BillListItem::new(bill, sponsor, count))
            })
            .collect();
        items.sort_by(|a, b| {
            b.status_at
                .cmp(&a.status_at)
                .then_with(|| a.bill_id.cmp(&b.bill_id))
        });
        items
    }

    pub fn bill_information(&self, bill_id: &str) -> Result<BillInformation, PartyLineError> {
        let bill = self
            .snapshot
            .bill(bill_id)
            .ok_or_else(|| PartyLineError::not_found("bill", bill_id))?;
        let sponsor = bill.sponsor_id.as_deref().and_then(|s| self.snapshot.sponsor(s));
        Ok(BillInformation::new(bill, sponsor))
    }

    /// Every roll call on the bill, date ascending.
    pub fn bill_vote_history(&self, bill_id: &str) -> Result<Vec<BillVoteRecord>, PartyLineError> {
        if self.snapshot.bill(bill_id).is_none() {
            return Err(PartyLineError::not_found("bill", bill_id));
        }
        Ok(self
            .snapshot
            .votes_for_bill(bill_id)
            .map(|vote| {
                let sponsor = self.resolve_sponsor_party(vote);
                let breakdown = PartyBreakdown::tally(&self.classify_vote(vote));
                BillVoteRecord {
                    vote: vote.clone(),
                    amendment: vote
                        .amendment_id
                        .as_deref()
                        .and_then(|a| self.snapshot.amendment(a))
                        .cloned(),
                    sponsor,
                    breakdown,
                }
            })
            .collect())
    }

    /// Bills sponsored by the legislator, matched by id or bioguide id.
    pub fn sponsored_bills(&self, legislator_id: &str) -> Vec<Bill> {
        let bioguide = self
            .snapshot
            .legislator(legislator_id)
            .map(|l| l.bioguide_id.as_str())
            .unwrap_or(legislator_id);
        let mut bills: Vec<Bill> = self
            .snapshot
            .bills()
            .iter()
            .filter(|b| b.sponsor_id.as_deref() == Some(bioguide))
            .cloned()
            .collect();
        bills.sort_by(|a, b| b.status_at.cmp(&a.status_at));
        bills
    }

    // ---- Nomination views ----

    /// Nomination votes in the latest-vote set, date ascending.
    pub fn nomination_votes(&self) -> Vec<NominationVote> {
        self.latest_votes()
            .votes
            .iter()
            .filter(|v| v.category == VoteCategory::Nomination)
            .map(NominationVote::from)
            .collect()
    }

    pub fn nomination_title(&self, vote_id: &str) -> Result<Option<String>, PartyLineError> {
        Ok(self.vote_event(vote_id)?.nomination_title.clone())
    }

    /// Ballots on one nomination vote, by registered party then name.
    pub fn nomination_ballots(
        &self,
        vote_id: &str,
        party: NominationPartyFilter,
    ) -> Result<Vec<NominationBallot>, PartyLineError> {
        let vote = self
            .snapshot
            .vote_event(vote_id)
            .filter(|v| v.category == VoteCategory::Nomination)
            .ok_or_else(|| PartyLineError::not_found("nomination vote", vote_id))?;
        let mut ballots: Vec<NominationBallot> = self
            .classify_vote(vote)
            .iter()
            .filter(|b| party.matches(&b.party))
            .map(NominationBallot::from)
            .collect();
        ballots.sort_by(|a, b| {
            a.party
                .cmp(&b.party)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.legislator_id.cmp(&b.legislator_id))
        });
        Ok(ballots)
    }

    /// Breakdown of every nomination vote in the latest-vote set, newest first.
    pub fn nomination_summary(&self) -> Vec<VoteBreakdown> {
        let latest = self.latest_votes();
        latest
            .votes
            .iter()
            .rev()
            .filter(|v| v.category == VoteCategory::Nomination)
            .map(|v| self.breakdown_for(v))
            .collect()
    }

    // ---- Integrity ----

    /// Every data-quality condition the snapshot currently triggers.
    pub fn integrity_report(&self) -> Vec<Diagnostic> {
        let mut report = sessions::find_session_overlaps(self.snapshot.sessions().sessions());
        for vote in self.snapshot.vote_events() {
            if let Some(ambiguity) = self
                .snapshot
                .sessions()
                .ambiguity_at(vote.chamber, vote.date.date())
            {
                if !report.contains(&ambiguity) {
                    report.push(ambiguity);
                }
            }
            if let SponsorResolution::Undefined { reason } = self.resolve_sponsor_party(vote) {
                report.push(Diagnostic::UnresolvedSponsorParty {
                    vote_id: vote.vote_id.clone(),
                    reason: reason.to_string(),
                });
            }
        }
        report.extend(self.latest_votes().ties.iter().cloned());
        report.extend(self.snapshot.orphan_ballots().iter().cloned());
        let summaries = self.per_legislator_summary(&SummaryFilter::default(), SortOrder::default());
        report.extend(aggregate::undefined_ratios(&summaries));
        report
    }

    // ---- Helpers ----

    fn vote_event(&self, vote_id: &str) -> Result<&VoteEvent, PartyLineError> {
        self.snapshot
            .vote_event(vote_id)
            .ok_or_else(|| PartyLineError::not_found("vote", vote_id))
    }

    /// Classify the ballots of one snapshot vote.
    fn classify_vote(&self, vote: &VoteEvent) -> Vec<ClassifiedBallot> {
        let sponsor = self.resolve_sponsor_party(vote);
        self.snapshot
            .ballots_for_vote(&vote.vote_id)
            .filter_map(|ballot| {
                let legislator = self.snapshot.ballot_legislator(ballot)?;
                Some(ClassifiedBallot::new(ballot, legislator, sponsor.party()))
            })
            .collect()
    }

    fn breakdown_for(&self, vote: &VoteEvent) -> VoteBreakdown {
        let sponsor = self.resolve_sponsor_party(vote);
        let breakdown = PartyBreakdown::tally(&self.classify_vote(vote));
        VoteBreakdown::new(vote, sponsor.into_party(), breakdown)
    }
}

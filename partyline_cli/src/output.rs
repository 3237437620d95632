use anyhow::Result;
use partyline_lib::sessions::session_label;
use partyline_lib::{
    BillListItem, BillVoteRecord, CongressSession, Diagnostic, LegislatorBallot,
    LegislatorSummary, NominationBallot, NominationGroups, NominationVote, Party, VoteBreakdown,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
pub struct SummaryRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Party")]
    #[serde(rename = "Party")]
    party: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "Chamber")]
    #[serde(rename = "Chamber")]
    chamber: String,
    #[tabled(rename = "Broke")]
    #[serde(rename = "Broke")]
    broke: u32,
    #[tabled(rename = "Votes")]
    #[serde(rename = "Votes")]
    total: u32,
    #[tabled(rename = "Broke %")]
    #[serde(rename = "Broke %")]
    percent: String,
}

#[derive(Tabled, Serialize)]
pub struct BreakdownRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Vote")]
    #[serde(rename = "Vote")]
    vote: String,
    #[tabled(rename = "Chamber")]
    #[serde(rename = "Chamber")]
    chamber: String,
    #[tabled(rename = "Subject")]
    #[serde(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Result")]
    #[serde(rename = "Result")]
    result: String,
    #[tabled(rename = "Sponsor")]
    #[serde(rename = "Sponsor")]
    sponsor: String,
    #[tabled(rename = "D Line")]
    #[serde(rename = "D Line")]
    dem_party_line: u32,
    #[tabled(rename = "D Broke")]
    #[serde(rename = "D Broke")]
    dem_not_party_line: u32,
    #[tabled(rename = "R Line")]
    #[serde(rename = "R Line")]
    rep_party_line: u32,
    #[tabled(rename = "R Broke")]
    #[serde(rename = "R Broke")]
    rep_not_party_line: u32,
    #[tabled(rename = "Other Line")]
    #[serde(rename = "Other Line")]
    other_party_line: u32,
    #[tabled(rename = "Other Broke")]
    #[serde(rename = "Other Broke")]
    other_not_party_line: u32,
    #[tabled(rename = "Abstain")]
    #[serde(rename = "Abstain")]
    abstain: u32,
    #[tabled(rename = "Unclassified")]
    #[serde(rename = "Unclassified")]
    unclassifiable: u32,
}

#[derive(Tabled, Serialize)]
pub struct BallotRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Vote")]
    #[serde(rename = "Vote")]
    vote: String,
    #[tabled(rename = "Subject")]
    #[serde(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Position")]
    #[serde(rename = "Position")]
    position: String,
    #[tabled(rename = "Sponsor")]
    #[serde(rename = "Sponsor")]
    sponsor: String,
    #[tabled(rename = "Classification")]
    #[serde(rename = "Classification")]
    classification: String,
}

#[derive(Tabled, Serialize)]
pub struct NominationBallotRow {
    #[tabled(rename = "Group")]
    #[serde(rename = "Group")]
    group: String,
    #[tabled(rename = "Subgroup")]
    #[serde(rename = "Subgroup")]
    subgroup: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "Caucus")]
    #[serde(rename = "Caucus")]
    caucus: String,
    #[tabled(rename = "Classification")]
    #[serde(rename = "Classification")]
    classification: String,
}

#[derive(Tabled, Serialize)]
pub struct NominationVoteRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Vote")]
    #[serde(rename = "Vote")]
    vote: String,
    #[tabled(rename = "Nomination")]
    #[serde(rename = "Nomination")]
    title: String,
    #[tabled(rename = "Result")]
    #[serde(rename = "Result")]
    result: String,
}

#[derive(Tabled, Serialize)]
pub struct BillRow {
    #[tabled(rename = "Bill")]
    #[serde(rename = "Bill")]
    bill_id: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Status Date")]
    #[serde(rename = "Status Date")]
    status_at: String,
    #[tabled(rename = "Sponsor")]
    #[serde(rename = "Sponsor")]
    sponsor: String,
    #[tabled(rename = "Votes")]
    #[serde(rename = "Votes")]
    votes: usize,
}

#[derive(Tabled, Serialize)]
pub struct SessionRow {
    #[tabled(rename = "Session")]
    #[serde(rename = "Session")]
    label: String,
    #[tabled(rename = "Majority")]
    #[serde(rename = "Majority")]
    majority: String,
    #[tabled(rename = "Start")]
    #[serde(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    #[serde(rename = "End")]
    end: String,
}

#[derive(Tabled, Serialize)]
pub struct DiagnosticRow {
    #[tabled(rename = "Issue")]
    #[serde(rename = "Issue")]
    issue: String,
}

// -- Row builders --

pub fn build_summary_rows(summaries: &[LegislatorSummary], first_rank: usize) -> Vec<SummaryRow> {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| SummaryRow {
            rank: first_rank + i,
            name: s.name.clone(),
            party: party_label(&s.party, &s.caucus),
            state: s.state.clone(),
            chamber: chamber_label(s.chamber),
            broke: s.broke_count,
            total: s.total_count,
            percent: format_percent(s.broke_percent),
        })
        .collect()
}

pub fn build_breakdown_rows(breakdowns: &[VoteBreakdown]) -> Vec<BreakdownRow> {
    breakdowns
        .iter()
        .map(|v| {
            let b = &v.breakdown;
            BreakdownRow {
                date: v.date.date().to_string(),
                vote: v.vote_id.clone(),
                chamber: chamber_label(v.chamber),
                subject: subject(v.bill_id.as_deref(), v.nomination_title.as_deref()),
                result: v.result.clone(),
                sponsor: format_party(v.sponsor_party.as_ref()),
                dem_party_line: b.dem_party_line,
                dem_not_party_line: b.dem_not_party_line,
                rep_party_line: b.rep_party_line,
                rep_not_party_line: b.rep_not_party_line,
                other_party_line: b.other_party_line,
                other_not_party_line: b.other_not_party_line,
                abstain: b.abstain_count,
                unclassifiable: b.unclassifiable_count,
            }
        })
        .collect()
}

/// Bill vote history rendered with the same columns as a breakdown.
pub fn build_bill_vote_rows(records: &[BillVoteRecord]) -> Vec<BreakdownRow> {
    let breakdowns: Vec<VoteBreakdown> = records
        .iter()
        .map(|r| VoteBreakdown::new(&r.vote, r.sponsor.party().cloned(), r.breakdown.clone()))
        .collect();
    let mut rows = build_breakdown_rows(&breakdowns);
    for (row, record) in rows.iter_mut().zip(records) {
        if let Some(amendment) = &record.amendment {
            row.subject = format!("{} ({})", row.subject, amendment.amendment_id);
        }
    }
    rows
}

pub fn build_ballot_rows(ballots: &[LegislatorBallot]) -> Vec<BallotRow> {
    ballots
        .iter()
        .map(|b| BallotRow {
            date: b.date.date().to_string(),
            vote: b.ballot.vote_id.clone(),
            subject: truncate(b.subject(), 60),
            position: b.ballot.position.as_str().to_string(),
            sponsor: format_party(b.ballot.sponsor_party.as_ref()),
            classification: b.ballot.classification.as_str().to_string(),
        })
        .collect()
}

pub fn build_nomination_ballot_rows(ballots: &[NominationBallot]) -> Vec<NominationBallotRow> {
    ballots
        .iter()
        .map(|b| NominationBallotRow {
            group: b.party.code().to_string(),
            subgroup: b.position.as_str().to_string(),
            name: b.name.clone(),
            state: b.state.clone(),
            caucus: b.caucus.code().to_string(),
            classification: b.classification.as_str().to_string(),
        })
        .collect()
}

/// Flatten a two-level grouping into rows, keeping group order.
pub fn build_nomination_group_rows(groups: &NominationGroups) -> Vec<NominationBallotRow> {
    let mut rows = Vec::new();
    for (outer, inner) in groups {
        for (key, members) in inner {
            for b in members {
                rows.push(NominationBallotRow {
                    group: outer.clone(),
                    subgroup: key.clone(),
                    name: b.name.clone(),
                    state: b.state.clone(),
                    caucus: b.caucus.code().to_string(),
                    classification: b.classification.as_str().to_string(),
                });
            }
        }
    }
    rows
}

pub fn build_nomination_vote_rows(votes: &[NominationVote]) -> Vec<NominationVoteRow> {
    votes
        .iter()
        .map(|v| NominationVoteRow {
            date: v.date.date().to_string(),
            vote: v.vote_id.clone(),
            title: truncate(v.title.as_deref().unwrap_or(""), 80),
            result: v.result.clone(),
        })
        .collect()
}

pub fn build_bill_rows(bills: &[BillListItem]) -> Vec<BillRow> {
    bills
        .iter()
        .map(|b| BillRow {
            bill_id: b.bill_id.clone(),
            title: truncate(&b.title, 60),
            status: b.status.clone(),
            status_at: b.status_at.date().to_string(),
            sponsor: match (&b.sponsor_name, &b.sponsor_caucus) {
                (Some(name), Some(caucus)) => format!("{} ({})", name, caucus.code()),
                (Some(name), None) => name.clone(),
                _ => b.sponsor_id.clone().unwrap_or_else(|| "-".to_string()),
            },
            votes: b.vote_count,
        })
        .collect()
}

pub fn build_session_rows(sessions: &[CongressSession]) -> Vec<SessionRow> {
    sessions
        .iter()
        .map(|s| SessionRow {
            label: session_label(s),
            majority: s.majority_party.code().to_string(),
            start: s.start_date.to_string(),
            end: s
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "open".to_string()),
        })
        .collect()
}

pub fn build_diagnostic_rows(diagnostics: &[Diagnostic]) -> Vec<DiagnosticRow> {
    diagnostics
        .iter()
        .map(|d| DiagnosticRow {
            issue: d.to_string(),
        })
        .collect()
}

// -- Rendering --

/// Print pre-built rows as a table, markdown, or CSV.
pub fn print_rows<R: Tabled + Serialize>(rows: Vec<R>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => print_csv(rows)?,
    }
    Ok(())
}

fn print_csv<R: Serialize>(rows: Vec<R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Formatting helpers --

/// Registered party, with the caucus appended when they differ (e.g. `I/D`).
fn party_label(party: &Party, caucus: &Party) -> String {
    if party == caucus {
        party.code().to_string()
    } else {
        format!("{}/{}", party.code(), caucus.code())
    }
}

fn chamber_label(chamber: partyline_lib::Chamber) -> String {
    match chamber {
        partyline_lib::Chamber::Senate => "Senate".to_string(),
        partyline_lib::Chamber::House => "House".to_string(),
    }
}

fn format_party(party: Option<&Party>) -> String {
    party.map(|p| p.code().to_string()).unwrap_or_else(|| "?".to_string())
}

fn format_percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{:.1}%", f * 100.0),
        None => "n/a".to_string(),
    }
}

fn subject(bill_id: Option<&str>, nomination_title: Option<&str>) -> String {
    truncate(bill_id.or(nomination_title).unwrap_or(""), 60)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use partyline_lib::{Chamber, Classification, PartyBreakdown, Position, VoteCategory, VoteEvent};

    fn summary(id: &str, party: Party, caucus: Party, broke: u32, total: u32) -> LegislatorSummary {
        LegislatorSummary {
            legislator_id: id.to_string(),
            name: format!("Member {}", id),
            state: "VT".to_string(),
            district: String::new(),
            chamber: Chamber::Senate,
            party,
            caucus,
            broke_count: broke,
            total_count: total,
            broke_percent: if total == 0 {
                None
            } else {
                Some(f64::from(broke) / f64::from(total))
            },
        }
    }

    fn vote(vote_id: &str) -> VoteEvent {
        VoteEvent {
            vote_id: vote_id.to_string(),
            vote_number: 30,
            bill_id: None,
            amendment_id: None,
            chamber: Chamber::Senate,
            date: NaiveDate::from_ymd_opt(2025, 2, 11)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            result: "Confirmed".to_string(),
            category: VoteCategory::Nomination,
            nomination_title: Some("Jane Doe, of Texas, to be United States District Judge for the Western District of Texas".to_string()),
        }
    }

    // -- Formatting helpers --

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(0.125)), "12.5%");
        assert_eq!(format_percent(Some(0.0)), "0.0%");
        assert_eq!(format_percent(None), "n/a");
    }

    #[test]
    fn test_party_label_shows_caucus_when_different() {
        assert_eq!(party_label(&Party::Independent, &Party::Democrat), "I/D");
        assert_eq!(party_label(&Party::Republican, &Party::Republican), "R");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    // -- Row builders --

    #[test]
    fn test_build_summary_rows_mapping() {
        let rows = build_summary_rows(
            &[
                summary("sanders", Party::Independent, Party::Democrat, 1, 4),
                summary("new", Party::Democrat, Party::Democrat, 0, 0),
            ],
            21,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 21);
        assert_eq!(rows[0].party, "I/D");
        assert_eq!(rows[0].chamber, "Senate");
        assert_eq!(rows[0].percent, "25.0%");
        assert_eq!(rows[1].rank, 22);
        assert_eq!(rows[1].percent, "n/a");
    }

    #[test]
    fn test_build_breakdown_rows_mapping() {
        let breakdown = PartyBreakdown {
            dem_party_line: 45,
            rep_party_line: 52,
            other_party_line: 2,
            abstain_count: 1,
            ..Default::default()
        };
        let rows = build_breakdown_rows(&[VoteBreakdown::new(
            &vote("s30-2025"),
            Some(Party::Republican),
            breakdown,
        )]);
        let row = &rows[0];
        assert_eq!(row.date, "2025-02-11");
        assert_eq!(row.sponsor, "R");
        assert_eq!(row.dem_party_line, 45);
        assert_eq!(row.other_party_line, 2);
        assert_eq!(row.abstain, 1);
        assert!(row.subject.starts_with("Jane Doe, of Texas"));
        assert!(row.subject.ends_with("..."));
    }

    #[test]
    fn test_build_breakdown_rows_unknown_sponsor() {
        let rows = build_breakdown_rows(&[VoteBreakdown::new(
            &vote("s31-2025"),
            None,
            PartyBreakdown::default(),
        )]);
        assert_eq!(rows[0].sponsor, "?");
    }

    #[test]
    fn test_build_nomination_group_rows_flattens_in_key_order() {
        let ballot = |name: &str, party: Party, position: Position| NominationBallot {
            vote_id: "s30-2025".to_string(),
            legislator_id: name.to_lowercase(),
            name: name.to_string(),
            state: "TX".to_string(),
            party: party.clone(),
            caucus: party,
            position,
            classification: Classification::PartyLine,
        };
        let mut groups = NominationGroups::new();
        groups
            .entry("R".to_string())
            .or_default()
            .insert("Yea".to_string(), vec![ballot("Cruz", Party::Republican, Position::Yea)]);
        groups
            .entry("D".to_string())
            .or_default()
            .insert("Nay".to_string(), vec![ballot("Booker", Party::Democrat, Position::Nay)]);

        let rows = build_nomination_group_rows(&groups);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, "D");
        assert_eq!(rows[0].name, "Booker");
        assert_eq!(rows[1].subgroup, "Yea");
        assert_eq!(rows[1].classification, "party line");
    }

    #[test]
    fn test_build_session_rows_open_ended() {
        let rows = build_session_rows(&[CongressSession {
            congress: 119,
            chamber: Chamber::Senate,
            session: 1,
            majority_party: Party::Republican,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            end_date: None,
        }]);
        assert_eq!(rows[0].label, "119-1 (senate)");
        assert_eq!(rows[0].majority, "R");
        assert_eq!(rows[0].end, "open");
    }

    #[test]
    fn test_csv_serialization_headers() {
        let rows = build_summary_rows(&[summary("cruz", Party::Republican, Party::Republican, 0, 3)], 1);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let header = data.lines().next().unwrap();
        assert_eq!(header, "Rank,Name,Party,State,Chamber,Broke,Votes,Broke %");
    }

    #[test]
    fn test_empty_rows() {
        assert!(build_summary_rows(&[], 1).is_empty());
        assert!(build_diagnostic_rows(&[]).is_empty());
    }
}

//! SQLite read access to the roll-call vote store.
//!
//! The store is populated by an external ingestion job. This module only
//! creates the schema (so fixtures and ingestion have a target) and reads
//! typed records back out; it never writes vote data.

use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rollcall_types::{
    Amendment, Ballot, Bill, Chamber, CongressSession, Legislator, Party, Position, VoteCategory,
    VoteEvent,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub struct Db {
    conn: Connection,
}

/// Everything the engine needs from one read of the store.
#[derive(Debug, Default, Clone)]
pub struct StoreContents {
    pub last_update: Option<String>,
    pub legislators: Vec<Legislator>,
    pub bills: Vec<Bill>,
    pub amendments: Vec<Amendment>,
    pub vote_events: Vec<VoteEvent>,
    pub ballots: Vec<Ballot>,
    pub sessions: Vec<CongressSession>,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for fixtures and tests).
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn init(&self) -> Result<(), DbError> {
        // Migrations run before the DDL so stores created by older ingestion
        // jobs pick up columns the indexes below reference.
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.migrate_v1()?;
            self.conn.pragma_update(None, "user_version", 1)?;
        }

        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        Ok(())
    }

    /// Amendment tracking: vote_meta gained `amendment_id`.
    fn migrate_v1(&self) -> Result<(), DbError> {
        match self
            .conn
            .execute("ALTER TABLE vote_meta ADD COLUMN amendment_id TEXT", [])
        {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                if msg.contains("duplicate column name") || msg.contains("no such table") => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Most recent ingestion timestamp, used as the snapshot version marker.
    pub fn last_update(&self) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row(
                "SELECT last_update FROM site_meta ORDER BY last_update DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// The full roster, including members with no recorded ballots.
    pub fn legislators(&self) -> Result<Vec<Legislator>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.bioguide_id, l.lis_id, l.name, l.state, l.district,
                    l.term_type, l.party, l.caucus, l.url, l.address, l.phone
             FROM legislators l
             ORDER BY l.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Legislator {
                id: row.get(0)?,
                bioguide_id: row.get(1)?,
                lis_id: row.get(2)?,
                name: row.get(3)?,
                state: row.get(4)?,
                district: row.get(5)?,
                term_type: parse_col::<Chamber>(row, 6)?,
                party: parse_col::<Party>(row, 7)?,
                caucus: parse_col::<Party>(row, 8)?,
                url: row.get(9)?,
                address: row.get(10)?,
                phone: row.get(11)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn bills(&self) -> Result<Vec<Bill>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT bill_id, bill_type, bill_number, title, short_title, sponsor_id,
                    status, status_at, congress
             FROM bills
             ORDER BY bill_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Bill {
                bill_id: row.get(0)?,
                bill_type: row.get(1)?,
                bill_number: row.get(2)?,
                title: row.get(3)?,
                short_title: row.get(4)?,
                sponsor_id: row.get(5)?,
                status: row.get(6)?,
                status_at: timestamp_col(row, 7)?,
                congress: row.get(8)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn amendments(&self) -> Result<Vec<Amendment>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT amendment_id, bill_id, sponsor_id, chamber, purpose
             FROM amendments
             ORDER BY amendment_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Amendment {
                amendment_id: row.get(0)?,
                bill_id: row.get(1)?,
                sponsor_id: row.get(2)?,
                chamber: parse_col::<Chamber>(row, 3)?,
                purpose: row.get(4)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// All vote events, oldest first.
    pub fn vote_events(&self) -> Result<Vec<VoteEvent>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT vote_id, vote_number, bill_id, amendment_id, chamber, date, result,
                    category, nomination_title
             FROM vote_meta
             ORDER BY date ASC, vote_number ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(VoteEvent {
                vote_id: row.get(0)?,
                vote_number: row.get(1)?,
                bill_id: row.get(2)?,
                amendment_id: row.get(3)?,
                chamber: parse_col::<Chamber>(row, 4)?,
                date: timestamp_col(row, 5)?,
                result: row.get(6)?,
                category: parse_col::<VoteCategory>(row, 7)?,
                nomination_title: row.get(8)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn ballots(&self) -> Result<Vec<Ballot>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT vote_id, legislator_id, position, original_position
             FROM votes
             ORDER BY vote_id, legislator_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Ballot {
                vote_id: row.get(0)?,
                legislator_id: row.get(1)?,
                position: parse_col::<Position>(row, 2)?,
                original_position: row.get(3)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn congress_sessions(&self) -> Result<Vec<CongressSession>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT congress, chamber, session, majority_party, start_date, end_date
             FROM congress_sessions
             ORDER BY chamber, start_date",
        )?;
        let rows = stmt.query_map([], |row| {
            let end_date: Option<String> = row.get(5)?;
            Ok(CongressSession {
                congress: row.get(0)?,
                chamber: parse_col::<Chamber>(row, 1)?,
                session: row.get(2)?,
                majority_party: parse_col::<Party>(row, 3)?,
                start_date: date_col(row, 4)?,
                end_date: end_date
                    .map(|s| parse_date(&s).map_err(|e| conversion_error(5, e)))
                    .transpose()?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Read every table the engine consumes in one pass.
    pub fn read_contents(&self) -> Result<StoreContents, DbError> {
        Ok(StoreContents {
            last_update: self.last_update()?,
            legislators: self.legislators()?,
            bills: self.bills()?,
            amendments: self.amendments()?,
            vote_events: self.vote_events()?,
            ballots: self.ballots()?,
            sessions: self.congress_sessions()?,
        })
    }
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Read a text column and parse it into one of the vocabulary types.
fn parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| conversion_error(idx, e))
}

fn timestamp_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).map_err(|e| conversion_error(idx, e))
}

fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_date(&raw).map_err(|e| conversion_error(idx, e))
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated ISO form (either with
/// optional fractional seconds), or a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| parse_date(trimmed).map(|d| d.and_time(chrono::NaiveTime::MIN)))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Chamber, Party};

/// One session of one chamber of a congress, with its majority party.
///
/// `end_date` of `None` means the session is still open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CongressSession {
    pub congress: u16,
    pub chamber: Chamber,
    pub session: u8,
    pub majority_party: Party,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CongressSession {
    /// True when `date` falls inside `[start_date, end_date]` for `chamber`.
    pub fn covers(&self, chamber: Chamber, date: NaiveDate) -> bool {
        self.chamber == chamber
            && date >= self.start_date
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// True when both sessions belong to the same chamber and their date
    /// ranges share at least one day.
    pub fn overlaps(&self, other: &CongressSession) -> bool {
        if self.chamber != other.chamber {
            return false;
        }
        let self_before_other = self.end_date.is_some_and(|end| end < other.start_date);
        let other_before_self = other.end_date.is_some_and(|end| end < self.start_date);
        !self_before_other && !other_before_self
    }
}

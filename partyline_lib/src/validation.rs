use rollcall_types::{BillId, Party};

use crate::aggregate::{ChamberFilter, SortOrder};
use crate::error::PartyLineError;
use crate::nomination::{GroupBy, NominationPartyFilter};

pub const MAX_ID_LENGTH: usize = 40;

pub const VALID_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "AS", "GU", "MP", "PR", "VI",
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, PartyLineError> {
    if input.len() > max_len {
        return Err(PartyLineError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(PartyLineError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a legislator, vote, or bill id: letters, digits, `-`, `_` and `.` only.
pub fn validate_id(input: &str) -> Result<String, PartyLineError> {
    let id = sanitize_text(input, MAX_ID_LENGTH)?;
    if id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Ok(id)
    } else {
        Err(PartyLineError::InvalidInput(format!(
            "invalid id '{}'. Expected letters, digits, '-', '_' or '.'",
            input
        )))
    }
}

/// Validate a US state code: uppercase, check against known states + territories.
pub fn validate_state(input: &str) -> Result<String, PartyLineError> {
    let upper = input.trim().to_uppercase();
    if VALID_STATES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(PartyLineError::InvalidInput(format!(
            "unknown state code '{}'. Valid codes: AL, AK, AZ, ... DC, PR, VI (50 states + DC + territories)",
            input
        )))
    }
}

/// Validate a registered-party filter. `all` means no restriction.
pub fn validate_party(input: &str) -> Result<Option<Party>, PartyLineError> {
    match input.trim().to_lowercase().as_str() {
        "all" => Ok(None),
        "democrat" | "d" => Ok(Some(Party::Democrat)),
        "republican" | "r" => Ok(Some(Party::Republican)),
        "independent" | "i" => Ok(Some(Party::Independent)),
        _ => Err(PartyLineError::InvalidInput(format!(
            "unknown party '{}'. Valid values: democrat (d), republican (r), independent (i), all",
            input
        ))),
    }
}

/// Validate a chamber filter: case-insensitive, supports the roster codes and shorthand.
pub fn validate_chamber(input: &str) -> Result<ChamberFilter, PartyLineError> {
    match input.trim().to_lowercase().as_str() {
        "senate" | "sen" | "s" => Ok(ChamberFilter::Senate),
        "house" | "rep" | "h" => Ok(ChamberFilter::House),
        "all" | "both" => Ok(ChamberFilter::Both),
        _ => Err(PartyLineError::InvalidInput(format!(
            "unknown chamber '{}'. Valid values: senate (sen), house (rep), all",
            input
        ))),
    }
}

pub fn validate_sort(input: &str) -> Result<SortOrder, PartyLineError> {
    input.parse::<SortOrder>().map_err(|_| {
        PartyLineError::InvalidInput(format!(
            "unknown sort order '{}'. Valid values: desc, asc",
            input
        ))
    })
}

pub fn validate_group_by(input: &str) -> Result<GroupBy, PartyLineError> {
    match input.trim().to_lowercase().as_str() {
        "party" => Ok(GroupBy::Party),
        "position" => Ok(GroupBy::Position),
        _ => Err(PartyLineError::InvalidInput(format!(
            "unknown grouping '{}'. Valid values: party, position",
            input
        ))),
    }
}

/// Validate a nomination party filter: `all`, `d`, `r`, or `other`.
pub fn validate_nomination_party(input: &str) -> Result<NominationPartyFilter, PartyLineError> {
    match input.trim().to_lowercase().as_str() {
        "all" => Ok(NominationPartyFilter::All),
        "d" | "democrat" => Ok(NominationPartyFilter::Democrat),
        "r" | "republican" => Ok(NominationPartyFilter::Republican),
        "other" => Ok(NominationPartyFilter::Other),
        _ => Err(PartyLineError::InvalidInput(format!(
            "unknown party filter '{}'. Valid values: all, d, r, other",
            input
        ))),
    }
}

/// Validate a composite bill id such as `hr22-119`, returned in canonical form.
pub fn validate_bill_id(input: &str) -> Result<BillId, PartyLineError> {
    let id = validate_id(input)?;
    id.parse::<BillId>().map_err(|e| {
        PartyLineError::InvalidInput(format!(
            "invalid bill id '{}': {}. Expected type, number and congress (e.g., hr22-119)",
            input, e
        ))
    })
}

/// Validate page number (must be >= 1).
pub fn validate_page(page: i64) -> Result<i64, PartyLineError> {
    if page < 1 {
        return Err(PartyLineError::InvalidInput(
            "page must be >= 1".to_string(),
        ));
    }
    Ok(page)
}

/// Validate page size (must be 1..=500).
pub fn validate_page_size(page_size: i64) -> Result<i64, PartyLineError> {
    if !(1..=500).contains(&page_size) {
        return Err(PartyLineError::InvalidInput(
            "page_size must be between 1 and 500".to_string(),
        ));
    }
    Ok(page_size)
}

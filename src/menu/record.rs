//! Weekly menu records
//!
//! Every reference date yields exactly two records, one per slot, sharing a
//! seven-day window that starts on the reference date.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::{CATEGORY, DATE_FORMAT, ID_DATE_FORMAT, WINDOW_DAYS};
use crate::error::ExtractionError;

use super::pattern::PriceMatch;

/// The two fixed positions on the weekly sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Nine,
    Fifteen,
}

impl Slot {
    pub(crate) const ALL: [Slot; 2] = [Slot::Nine, Slot::Fifteen];

    /// Two-digit suffix appended to the week key to form a record id
    pub(crate) fn code(self) -> &'static str {
        match self {
            Slot::Nine => "09",
            Slot::Fifteen => "15",
        }
    }

    /// Slot number as printed on the sign
    pub(crate) fn label(self) -> &'static str {
        match self {
            Slot::Nine => "9",
            Slot::Fifteen => "15",
        }
    }

    /// "weekly set meal #9" / "weekly set meal #15"
    pub(crate) fn description(self) -> &'static str {
        match self {
            Slot::Nine => "週代わり定食9番",
            Slot::Fifteen => "週代わり定食15番",
        }
    }
}

/// One ledger row. Field order is the column order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MenuRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) price: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) day_start: String,
    pub(crate) day_end: String,
}

/// Week key for a reference date: "20240304"
pub(crate) fn week_key(reference: NaiveDate) -> String {
    reference.format(ID_DATE_FORMAT).to_string()
}

fn build_record(slot: Slot, entry: &PriceMatch, reference: NaiveDate) -> MenuRecord {
    let day_end = reference + Duration::days(WINDOW_DAYS);
    MenuRecord {
        id: format!("{}{}", week_key(reference), slot.code()),
        name: entry.name.clone(),
        price: entry.price.clone(),
        category: CATEGORY.to_string(),
        description: slot.description().to_string(),
        day_start: reference.format(DATE_FORMAT).to_string(),
        day_end: day_end.format(DATE_FORMAT).to_string(),
    }
}

/// Build the slot 9 and slot 15 records from the first two priced entries.
///
/// The id depends only on the reference date and the slot, never on the
/// slot number captured from the text.
pub(crate) fn build_records(
    entries: &[PriceMatch; 2],
    reference: NaiveDate,
) -> Result<[MenuRecord; 2], ExtractionError> {
    for (slot, entry) in Slot::ALL.iter().zip(entries) {
        if entry.name.is_empty() {
            return Err(ExtractionError::EmptyName { slot: slot.label() });
        }
    }

    Ok([
        build_record(Slot::Nine, &entries[0], reference),
        build_record(Slot::Fifteen, &entries[1], reference),
    ])
}

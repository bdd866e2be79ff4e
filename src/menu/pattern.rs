//! Priced-entry matching over OCR text
//!
//! A priced entry is a slot number, a period, the dish name and a price
//! followed by the currency marker, e.g. `9.カレー800円`. OCR output is
//! flattened first so entries split across lines still match.

use std::sync::LazyLock;

use regex::Regex;

use crate::consts::CURRENCY_MARKER;
use crate::error::ExtractionError;

use super::record::Slot;

static PRICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(9|15)\.(.*?)([0-9]+){CURRENCY_MARKER}"))
        .expect("Static regex pattern is guaranteed to be valid")
});

/// One priced entry as captured from the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PriceMatch {
    /// Slot number as read from the text ("9" or "15")
    pub(crate) slot: String,
    pub(crate) name: String,
    /// Digits as captured, never parsed
    pub(crate) price: String,
}

/// How the first two matches are assigned to slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotCheck {
    /// First match is slot 9, second is slot 15, whatever was captured
    Positional,
    /// Captured slot numbers must read 9 then 15
    Strict,
}

/// Remove every whitespace character, newlines and ideographic spaces included
pub(crate) fn flatten(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// All non-overlapping priced entries in encounter order
pub(crate) fn find_all(text: &str) -> Vec<PriceMatch> {
    PRICE_LINE
        .captures_iter(text)
        .map(|caps| PriceMatch {
            slot: caps[1].to_string(),
            name: caps[2].to_string(),
            price: caps[3].to_string(),
        })
        .collect()
}

/// The two entries for slot 9 and slot 15
pub(crate) fn extract(text: &str, check: SlotCheck) -> Result<[PriceMatch; 2], ExtractionError> {
    let matches = find_all(text);
    let found = matches.len();
    let mut matches = matches.into_iter();
    let (Some(first), Some(second)) = (matches.next(), matches.next()) else {
        return Err(ExtractionError::InsufficientEntries { found });
    };
    let entries = [first, second];

    if check == SlotCheck::Strict {
        for (position, (slot, entry)) in Slot::ALL.iter().zip(&entries).enumerate() {
            if entry.slot != slot.label() {
                return Err(ExtractionError::SlotMismatch {
                    position: position + 1,
                    expected: slot.label(),
                    found: entry.slot.clone(),
                });
            }
        }
    }

    Ok(entries)
}

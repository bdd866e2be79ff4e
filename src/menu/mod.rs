//! Menu extraction: OCR text in, two weekly records out

mod pattern;
mod record;

pub(crate) use pattern::{SlotCheck, extract, flatten};
pub(crate) use record::{MenuRecord, build_records, week_key};

//! One weekly run: check the ledger, then extract, build and append
//!
//! Runs are expected to be triggered one at a time by a scheduler; the
//! ledger lock taken in [`Pipeline::record_week`] keeps overlapping runs from
//! recording the same week twice. Every failure aborts the run with the
//! ledger unchanged, and the next scheduled run starts from scratch.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{AppError, ExtractionError};
use crate::ledger::WeeklyLedger;
use crate::menu::{MenuRecord, SlotCheck, build_records, extract, flatten, week_key};
use crate::source::{OcrEngine, PostSource};
use crate::utils::Timezone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    AlreadyRecorded { week_key: String },
    Recorded { records: [MenuRecord; 2] },
}

pub(crate) struct Pipeline {
    ledger_path: PathBuf,
    slot_check: SlotCheck,
}

impl Pipeline {
    pub(crate) fn new(ledger_path: impl Into<PathBuf>, slot_check: SlotCheck) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            slot_check,
        }
    }

    /// Turn raw OCR text into the two weekly records without touching the ledger.
    pub(crate) fn extract_records(
        &self,
        raw_text: &str,
        reference: NaiveDate,
    ) -> Result<[MenuRecord; 2], ExtractionError> {
        let text = flatten(raw_text);
        let entries = extract(&text, self.slot_check)?;
        build_records(&entries, reference)
    }

    /// Record the week starting at `reference` unless the ledger already has it.
    ///
    /// `text` is only called for a week that is not yet recorded, so the OCR
    /// request behind it is skipped on repeat runs.
    pub(crate) fn record_week<F>(&self, reference: NaiveDate, text: F) -> Result<RunOutcome, AppError>
    where
        F: FnOnce() -> Result<String, AppError>,
    {
        let mut ledger = WeeklyLedger::open(&self.ledger_path)?;
        let key = week_key(reference);

        if ledger.is_recorded(&key)? {
            info!(week_key = %key, "already done");
            return Ok(RunOutcome::AlreadyRecorded { week_key: key });
        }

        let raw_text = text()?;
        let records = self.extract_records(&raw_text, reference)?;
        ledger.append(&records)?;

        info!(
            week_key = %key,
            ledger = %ledger.path().display(),
            "recorded {} / {}",
            records[0].name,
            records[1].name
        );
        Ok(RunOutcome::Recorded { records })
    }

    /// Full weekly run: newest post, its date in `timezone`, then
    /// [`Pipeline::record_week`] with OCR of the post image as the text.
    pub(crate) fn run(
        &self,
        feed: &dyn PostSource,
        ocr: &dyn OcrEngine,
        timezone: Timezone,
    ) -> Result<RunOutcome, AppError> {
        info!(feed = feed.name(), ocr = ocr.name(), "looking for this week's post");
        let post = feed.latest_post()?;
        debug!(id = %post.id, text = %post.text, "post text");
        let reference = timezone.date_of(post.created_at);

        self.record_week(reference, || {
            let image_url = post.image_url()?;
            Ok(ocr.recognize(image_url)?)
        })
    }
}

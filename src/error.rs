use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Failed to read menu text: {0}")]
    Input(std::io::Error),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Source(#[from] SourceError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ExtractionError {
    #[error("insufficient priced entries: found {found}, need 2")]
    InsufficientEntries { found: usize },

    #[error("priced entry #{position} is slot {found}, expected slot {expected}")]
    SlotMismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("priced entry for slot {slot} has an empty dish name")]
    EmptyName { slot: &'static str },
}

#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    #[error("Failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed ledger {} at line {line}: {reason}", path.display())]
    Format {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Failed to write ledger {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Unexpected response from {service}: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },

    #[error("No weekly menu post found")]
    NoPost,

    #[error("Post {id} has no attached image")]
    NoImage { id: String },

    #[error("OCR failed: {0}")]
    Ocr(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_date() {
        let e = AppError::InvalidDate {
            input: "abc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid date "abc" (expected YYYYMMDD or YYYY-MM-DD)"#
        );
    }

    #[test]
    fn app_error_display_timezone() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn extraction_error_insufficient() {
        let e = ExtractionError::InsufficientEntries { found: 1 };
        assert_eq!(e.to_string(), "insufficient priced entries: found 1, need 2");
    }

    #[test]
    fn extraction_error_slot_mismatch() {
        let e = ExtractionError::SlotMismatch {
            position: 1,
            expected: "9",
            found: "15".to_string(),
        };
        assert_eq!(e.to_string(), "priced entry #1 is slot 15, expected slot 9");
    }

    #[test]
    fn ledger_error_format_names_line() {
        let e = LedgerError::Format {
            path: PathBuf::from("weekly.csv"),
            line: 3,
            reason: "id \"2024\" is shorter than 8 characters".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Malformed ledger weekly.csv at line 3: id "2024" is shorter than 8 characters"#
        );
    }

    #[test]
    fn source_error_missing_credential() {
        let e = SourceError::MissingCredential("VISION_API_KEY");
        assert_eq!(e.to_string(), "Missing credential: set VISION_API_KEY");
    }

    #[test]
    fn app_error_from_extraction_error() {
        let app: AppError = ExtractionError::InsufficientEntries { found: 0 }.into();
        assert_eq!(app.to_string(), "insufficient priced entries: found 0, need 2");
    }
}

//! Weekly ledger: the append-only CSV table of recorded menus
//!
//! A week counts as recorded as soon as any row's id starts with its week
//! key. [`WeeklyLedger`] holds an exclusive lock on the file for its whole
//! lifetime, so `is_recorded` followed by `append` on one value cannot race
//! another run. The lock is advisory: writers that bypass this type are not
//! excluded.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{LEDGER_HEADER, WEEK_KEY_LEN};
use crate::error::LedgerError;
use crate::menu::MenuRecord;

pub(crate) struct WeeklyLedger {
    path: PathBuf,
    file: File,
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

impl WeeklyLedger {
    /// Open an existing ledger and take the exclusive lock, blocking until
    /// any other holder releases it.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|source| LedgerError::Read {
                path: path.clone(),
                source,
            })?;
        file.lock().map_err(|source| LedgerError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "ledger locked");
        Ok(Self { path, file })
    }

    /// Create a new ledger holding only the header row.
    pub(crate) fn create(path: &Path) -> Result<(), LedgerError> {
        let write_err = |source| LedgerError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(write_err)?;

        let mut writer = csv_writer(&file);
        writer
            .write_record(LEDGER_HEADER)
            .map_err(|e| write_err(e.into()))?;
        writer.flush().map_err(write_err)?;
        drop(writer);
        file.sync_all().map_err(write_err)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// True if any stored row belongs to `week_key`.
    pub(crate) fn is_recorded(&self, week_key: &str) -> Result<bool, LedgerError> {
        let mut reader = self.reader()?;
        for result in reader.records() {
            let record = result.map_err(|e| self.csv_error(e))?;
            let id = record.get(0).unwrap_or_default();
            let Some(key) = id.get(..WEEK_KEY_LEN) else {
                return Err(LedgerError::Format {
                    path: self.path.clone(),
                    line: record.position().map_or(0, |p| p.line()),
                    reason: format!("id \"{id}\" has no {WEEK_KEY_LEN}-character week key"),
                });
            };
            if key == week_key {
                debug!(week_key, id, "week already in ledger");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every stored row, header excluded, in file order.
    pub(crate) fn rows(&self) -> Result<Vec<MenuRecord>, LedgerError> {
        let mut reader = self.reader()?;
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| self.csv_error(e))?;
            let row = record
                .deserialize::<MenuRecord>(None)
                .map_err(|e| self.csv_error(e))?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Append all records with one write, then sync to disk.
    ///
    /// The rows are encoded into a single buffer first, so a failed encode
    /// leaves the file untouched and a run never leaves half a week behind.
    pub(crate) fn append(&mut self, records: &[MenuRecord]) -> Result<(), LedgerError> {
        let len = self
            .file
            .metadata()
            .map_err(|source| self.write_error(source))?
            .len();

        let mut buf = Vec::new();
        if len > 0 && !self.ends_with_newline()? {
            buf.push(b'\n');
        }
        {
            let mut writer = csv_writer(&mut buf);
            if len == 0 {
                writer
                    .write_record(LEDGER_HEADER)
                    .map_err(|e| self.write_error(e.into()))?;
            }
            for record in records {
                writer
                    .serialize(record)
                    .map_err(|e| self.write_error(e.into()))?;
            }
            writer.flush().map_err(|source| self.write_error(source))?;
        }

        (&self.file)
            .write_all(&buf)
            .map_err(|source| self.write_error(source))?;
        self.file
            .sync_all()
            .map_err(|source| self.write_error(source))?;
        debug!(rows = records.len(), bytes = buf.len(), "ledger appended");
        Ok(())
    }

    fn reader(&self) -> Result<csv::Reader<&File>, LedgerError> {
        (&self.file)
            .seek(SeekFrom::Start(0))
            .map_err(|source| self.read_error(source))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(&self.file);

        let columns = reader.headers().map_err(|e| self.csv_error(e))?.len();
        if columns != 0 && columns != LEDGER_HEADER.len() {
            return Err(LedgerError::Format {
                path: self.path.clone(),
                line: 1,
                reason: format!(
                    "header has {columns} columns, expected {}",
                    LEDGER_HEADER.len()
                ),
            });
        }
        Ok(reader)
    }

    fn ends_with_newline(&self) -> Result<bool, LedgerError> {
        let mut last = [0u8; 1];
        (&self.file)
            .seek(SeekFrom::End(-1))
            .and_then(|_| (&self.file).read_exact(&mut last))
            .map_err(|source| self.read_error(source))?;
        Ok(last[0] == b'\n')
    }

    fn csv_error(&self, err: csv::Error) -> LedgerError {
        let line = err.position().map_or(0, |p| p.line());
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => self.read_error(source),
            _ => LedgerError::Format {
                path: self.path.clone(),
                line,
                reason,
            },
        }
    }

    fn read_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "id,name,price,category,description,dayStart,dayEnd\n";

    fn record(id: &str, name: &str, price: &str) -> MenuRecord {
        MenuRecord {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            category: "定食".to_string(),
            description: "週代わり定食9番".to_string(),
            day_start: "2024-03-04".to_string(),
            day_end: "2024-03-10".to_string(),
        }
    }

    fn ledger_with(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("weekly.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn create_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weekly.csv");
        WeeklyLedger::create(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), HEADER);
    }

    #[test]
    fn create_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = ledger_with(&dir, HEADER);
        let err = WeeklyLedger::create(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Write { .. }));
    }

    #[test]
    fn open_missing_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = WeeklyLedger::open(dir.path().join("missing.csv")).err().unwrap();
        assert!(matches!(err, LedgerError::Read { .. }));
    }

    #[test]
    fn is_recorded_matches_week_prefix() {
        let dir = TempDir::new().unwrap();
        let content = format!(
            "{HEADER}2024022609,Curry,800,定食,週代わり定食9番,2024-02-26,2024-03-03\n\
             2024030415,Ramen,700,定食,週代わり定食15番,2024-03-04,2024-03-10\n"
        );
        let ledger = WeeklyLedger::open(ledger_with(&dir, &content)).unwrap();

        assert!(ledger.is_recorded("20240304").unwrap());
        assert!(ledger.is_recorded("20240226").unwrap());
        assert!(!ledger.is_recorded("20240311").unwrap());
    }

    #[test]
    fn header_only_is_not_recorded() {
        let dir = TempDir::new().unwrap();
        let ledger = WeeklyLedger::open(ledger_with(&dir, HEADER)).unwrap();
        assert!(!ledger.is_recorded("20240304").unwrap());
        assert!(ledger.rows().unwrap().is_empty());
    }

    #[test]
    fn short_id_is_format_error() {
        let dir = TempDir::new().unwrap();
        let content = format!("{HEADER}2024,Curry,800,定食,週代わり定食9番,2024-03-04,2024-03-10\n");
        let ledger = WeeklyLedger::open(ledger_with(&dir, &content)).unwrap();

        match ledger.is_recorded("20240304").unwrap_err() {
            LedgerError::Format { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("2024"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_row_is_format_error() {
        let dir = TempDir::new().unwrap();
        let content = format!("{HEADER}2024030409,Curry,800\n");
        let ledger = WeeklyLedger::open(ledger_with(&dir, &content)).unwrap();
        let err = ledger.is_recorded("20240304").unwrap_err();
        assert!(matches!(err, LedgerError::Format { .. }));
    }

    #[test]
    fn wrong_header_is_format_error() {
        let dir = TempDir::new().unwrap();
        let ledger = WeeklyLedger::open(ledger_with(&dir, "id,name\n")).unwrap();
        let err = ledger.is_recorded("20240304").unwrap_err();
        assert!(matches!(err, LedgerError::Format { line: 1, .. }));
    }

    #[test]
    fn append_then_read_back() {
        let dir = TempDir::new().unwrap();
        let path = ledger_with(&dir, HEADER);
        let records = [
            record("2024030409", "Curry", "800"),
            record("2024030415", "Ramen", "700"),
        ];

        {
            let mut ledger = WeeklyLedger::open(&path).unwrap();
            ledger.append(&records).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.ends_with('\n'));

        let ledger = WeeklyLedger::open(&path).unwrap();
        assert_eq!(ledger.rows().unwrap(), records.to_vec());
        assert!(ledger.is_recorded("20240304").unwrap());
    }

    #[test]
    fn append_to_empty_file_writes_header() {
        let dir = TempDir::new().unwrap();
        let path = ledger_with(&dir, "");
        let mut ledger = WeeklyLedger::open(&path).unwrap();
        ledger.append(&[record("2024030409", "Curry", "800")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(HEADER));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn append_after_missing_newline_starts_new_row() {
        let dir = TempDir::new().unwrap();
        let path = ledger_with(&dir, HEADER.trim_end());
        let mut ledger = WeeklyLedger::open(&path).unwrap();
        ledger.append(&[record("2024030409", "Curry", "800")]).unwrap();

        assert_eq!(ledger.rows().unwrap().len(), 1);
    }

    #[test]
    fn names_with_delimiters_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = ledger_with(&dir, HEADER);
        let tricky = record("2024030409", "Fish, \"fried\"", "900");

        let mut ledger = WeeklyLedger::open(&path).unwrap();
        ledger.append(std::slice::from_ref(&tricky)).unwrap();
        assert_eq!(ledger.rows().unwrap(), vec![tricky]);
    }

    #[test]
    fn lock_is_exclusive_while_open() {
        let dir = TempDir::new().unwrap();
        let path = ledger_with(&dir, HEADER);
        let ledger = WeeklyLedger::open(&path).unwrap();

        let other = File::open(&path).unwrap();
        assert!(other.try_lock().is_err());

        drop(ledger);
        assert!(other.try_lock().is_ok());
    }
}

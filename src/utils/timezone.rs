use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// Timezone in which a post timestamp becomes the week's reference date
///
/// Defaults to UTC so a post maps to the same week key on every host.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("utc")
            || trimmed.eq_ignore_ascii_case("z")
        {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    /// Calendar date of `utc` in this timezone
    pub(crate) fn date_of(self, utc: DateTime<Utc>) -> NaiveDate {
        match self {
            Timezone::Local => utc.with_timezone(&Local).date_naive(),
            Timezone::Named(tz) => utc.with_timezone(&tz).date_naive(),
        }
    }

    pub(crate) fn today(self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

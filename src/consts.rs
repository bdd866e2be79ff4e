/// Date format used for `dayStart`/`dayEnd`: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format of the week key and the leading part of every record id: "20250115"
pub(crate) const ID_DATE_FORMAT: &str = "%Y%m%d";

/// Length of the week key prefix of a record id
pub(crate) const WEEK_KEY_LEN: usize = 8;

/// Days added to `dayStart` to get the inclusive `dayEnd`
pub(crate) const WINDOW_DAYS: i64 = 6;

/// Category shared by both weekly slots ("set meal")
pub(crate) const CATEGORY: &str = "定食";

/// Currency marker that terminates a priced entry
pub(crate) const CURRENCY_MARKER: &str = "円";

/// Ledger column names, in row order
pub(crate) const LEDGER_HEADER: [&str; 7] = [
    "id",
    "name",
    "price",
    "category",
    "description",
    "dayStart",
    "dayEnd",
];

pub(crate) const DEFAULT_LEDGER_FILE: &str = "weekly.csv";

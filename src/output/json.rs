use serde_json::json;

use crate::menu::MenuRecord;

pub(crate) fn output_records_json(records: &[MenuRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

pub(crate) fn output_check_json(week_key: &str, recorded: bool) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "week_key": week_key,
        "recorded": recorded,
    }))
}

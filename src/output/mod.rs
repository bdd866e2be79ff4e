mod json;
mod table;

pub(crate) use json::{output_check_json, output_records_json};
pub(crate) use table::print_records_table;

use dm_core::app_error::{AppError, AppResult};
use dm_core::canon_json::string_list;
use dm_core::types::RawMetadata;
use std::path::Path;

fn csv_error(message: &str, path: &Path, e: csv::Error) -> AppError {
    let mut details = serde_json::json!({ "error": e.to_string(), "path": path });
    if let Some(line) = e.position().map(|p| p.line()) {
        details["line"] = serde_json::json!(line);
    }
    AppError::extraction(message, details)
}

/// Header row plus data row count. The first record is always the header and its
/// cells are reported verbatim; rows may vary in width. Blank lines are not rows.
pub fn extract_csv(path: &Path) -> AppResult<RawMetadata> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error("failed to open csv file", path, e))?;

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| csv_error("failed to read csv header", path, e))?,
        None => csv::StringRecord::new(),
    };

    let mut row_count: usize = 0;
    for record in records {
        record.map_err(|e| csv_error("failed to read csv row", path, e))?;
        row_count += 1;
    }

    let column_names: Vec<String> = header.iter().map(str::to_string).collect();
    let mut raw = RawMetadata::new();
    raw.insert("column_count", column_names.len());
    raw.insert("column_names", string_list(&column_names)?);
    raw.insert("row_count", row_count);
    Ok(raw)
}

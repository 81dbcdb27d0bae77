use crate::commands::extract::extract_file;
use dm_core::app_error::AppResult;
use dm_core::config::ConfigV1;
use dm_core::store::MetadataStore;
use std::path::Path;

/// Records are keyed by the file's base name, not the path it was read from.
pub fn stored_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

pub fn run_save(config: &ConfigV1, path: &str) -> AppResult<()> {
    // extraction failures never touch the database
    let extracted = extract_file(config, path)?;

    let store = MetadataStore::open(&config.db_path())?;
    let record = store.save(&stored_filename(path), &extracted.canonical, &extracted.hash)?;
    println!("saved record {} ({})", record.id, record.hash);
    store.close()
}

use dm_core::app_error::AppResult;
use dm_core::canon_json::to_canonical_string;
use dm_core::config::ConfigV1;
use dm_extract::{extract_metadata_with, DefaultExtractor, ExtractOptions, ExtractedMetadata};
use std::path::Path;

pub fn extract_file(config: &ConfigV1, path: &str) -> AppResult<ExtractedMetadata> {
    let extractor = DefaultExtractor::new(ExtractOptions::from(&config.extract));
    extract_metadata_with(&extractor, Path::new(path))
}

pub fn run_extract(config: &ConfigV1, path: &str, json: bool) -> AppResult<()> {
    let extracted = extract_file(config, path)?;

    if json {
        let metadata: serde_json::Map<String, serde_json::Value> = extracted
            .canonical
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        let out = serde_json::json!({
            "path": path,
            "format": extracted.format.as_str(),
            "hash": extracted.hash.as_str(),
            "metadata": metadata,
        });
        println!("{}", to_canonical_string(&out)?);
        return Ok(());
    }

    println!("format: {}", extracted.format);
    println!("hash: {}", extracted.hash);
    print!("{}", extracted.canonical.to_lines());
    Ok(())
}

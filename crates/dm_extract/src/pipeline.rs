use crate::detect::detect;
use crate::extractor::DefaultExtractor;
use dm_core::app_error::AppResult;
use dm_core::hashing::digest;
use dm_core::normalize::{normalize, CanonicalMetadata};
use dm_core::services::MetadataExtractor;
use dm_core::types::{FormatTag, MetadataHash};
use std::path::Path;

/// Canonical metadata of one file plus its hash; kept by the caller so a failed save can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub format: FormatTag,
    pub canonical: CanonicalMetadata,
    pub hash: MetadataHash,
}

pub fn extract_metadata(path: &Path) -> AppResult<ExtractedMetadata> {
    extract_metadata_with(&DefaultExtractor::default(), path)
}

pub fn extract_metadata_with(
    extractor: &dyn MetadataExtractor,
    path: &Path,
) -> AppResult<ExtractedMetadata> {
    let format = detect(path)?;
    let raw = extractor.extract(path, format)?;
    let canonical = normalize(&raw);
    let hash = digest(&canonical);
    Ok(ExtractedMetadata {
        format,
        canonical,
        hash,
    })
}

use crate::app_error::AppResult;
use crate::types::{FormatTag, RawMetadata};
use std::path::Path;

/// One capability for every supported format: read a file, return its raw metadata.
///
/// Implementations open the file read-only and release it before returning,
/// on success and on every error path.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, path: &Path, format: FormatTag) -> AppResult<RawMetadata>;
}

use dm_core::app_error::{AppError, AppResult};
use dm_core::types::FormatTag;
use std::path::Path;

/// Maps a path to its format by extension alone; the file is never opened.
pub fn detect(path: &Path) -> AppResult<FormatTag> {
    let ext = path
        .extension()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default();

    FormatTag::from_extension(&ext).ok_or_else(|| AppError::unsupported_format(&ext))
}

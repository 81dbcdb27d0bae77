use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub schema_version: u32,
    pub code: String,
    pub category: String,
    pub message: String,
    pub retryable: bool,
    pub details: Value,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: &str, category: &str, message: &str, retryable: bool, details: Value) -> Self {
        Self {
            schema_version: 1,
            code: code.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            retryable,
            details,
        }
    }

    /// The extension is reported verbatim so the caller can show it back to the user.
    pub fn unsupported_format(extension: &str) -> Self {
        Self::new(
            "DM_UNSUPPORTED_FORMAT",
            "format",
            "unsupported file extension",
            false,
            json!({
                "extension": extension,
                "supported": crate::types::FormatTag::supported_extensions(),
            }),
        )
    }

    pub fn extraction(message: &str, details: Value) -> Self {
        Self::new("DM_EXTRACTION_FAILED", "extract", message, false, details)
    }

    /// Storage failures are retryable: the caller still holds the extraction result.
    pub fn persistence(message: &str, details: Value) -> Self {
        Self::new("DM_PERSISTENCE_FAILED", "store", message, true, details)
    }
}

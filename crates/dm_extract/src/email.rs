use crate::text::{collapse_whitespace, non_empty};
use crate::timestamps::from_unix_seconds;
use dm_core::app_error::{AppError, AppResult};
use dm_core::types::RawMetadata;
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};
use std::fs;
use std::path::Path;

const HEADER_FIELDS: &[(&str, &str)] = &[
    ("Subject", "subject"),
    ("From", "from"),
    ("To", "to"),
    ("Cc", "cc"),
    ("Message-ID", "message_id"),
];

/// Parts marked `Content-Disposition: attachment`, at any depth.
pub fn count_attachments(part: &ParsedMail<'_>) -> usize {
    let own = usize::from(matches!(
        part.get_content_disposition().disposition,
        DispositionType::Attachment
    ));
    own + part.subparts.iter().map(count_attachments).sum::<usize>()
}

pub fn extract_email(path: &Path) -> AppResult<RawMetadata> {
    let bytes = fs::read(path).map_err(|e| {
        AppError::extraction(
            "failed to read email file",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    let mail = mailparse::parse_mail(&bytes).map_err(|e| {
        AppError::extraction(
            "failed to parse email message",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;

    let mut raw = RawMetadata::new();
    for (header, field) in HEADER_FIELDS {
        raw.insert_text(
            *field,
            mail.headers
                .get_first_value(header)
                .and_then(|v| non_empty(&collapse_whitespace(&v))),
        );
    }

    if let Some(date) = mail.headers.get_first_value("Date") {
        match mailparse::dateparse(&date).ok().and_then(from_unix_seconds) {
            Some(ts) => raw.insert("date", ts),
            None => tracing::warn!(value = %date, "skipping unparseable email date"),
        }
    }

    raw.insert("attachment_count", count_attachments(&mail));
    Ok(raw)
}

use crate::extractor::ExtractOptions;
use crate::text::{non_empty, preview};
use crate::timestamps::normalize_pdf_date;
use dm_core::app_error::{AppError, AppResult};
use dm_core::types::{RawMetadata, RawValue};
use lopdf::{Document, Object};
use std::path::Path;

/// Info dictionary key and the field it is reported as. Other keys become `info_<key>`.
const INFO_TEXT_FIELDS: &[(&[u8], &str)] = &[
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Keywords", "keywords"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
    (b"Trapped", "trapped"),
];

const INFO_DATE_FIELDS: &[(&[u8], &str)] = &[(b"CreationDate", "created"), (b"ModDate", "modified")];

/// Decodes a PDF text string: UTF-16BE when it carries a byte order mark, otherwise
/// single-byte PDFDocEncoding (read as Latin-1).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(body) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(body).into_owned();
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn info_value(object: &Object) -> Option<RawValue> {
    match object {
        Object::String(bytes, _) => non_empty(&decode_pdf_string(bytes)).map(RawValue::Text),
        Object::Name(name) => non_empty(&String::from_utf8_lossy(name)).map(RawValue::Text),
        Object::Integer(n) => Some(RawValue::Integer(*n)),
        Object::Real(r) => Some(RawValue::Float(f64::from(*r))),
        Object::Boolean(b) => Some(RawValue::Bool(*b)),
        _ => None,
    }
}

fn info_field_name(key: &[u8]) -> String {
    let cleaned: String = String::from_utf8_lossy(key)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("info_{cleaned}")
}

/// Inserts a custom Info field; a name already taken by another key gets a `_2`, `_3`, ... suffix.
fn insert_custom_field(raw: &mut RawMetadata, base: String, value: RawValue) -> String {
    let mut name = base.clone();
    let mut n = 2;
    while raw.contains(&name) {
        name = format!("{base}_{n}");
        n += 1;
    }
    if name != base {
        tracing::warn!(field = %base, renamed = %name, "pdf info keys collide after sanitizing");
    }
    raw.insert(name.clone(), value);
    name
}

fn insert_info(doc: &Document, raw: &mut RawMetadata) {
    let Some(info) = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
    else {
        return;
    };

    for (key, value) in info.iter() {
        let Some(value) = resolve(doc, value).and_then(info_value) else {
            continue;
        };
        let key = key.as_slice();

        if let Some((_, field)) = INFO_DATE_FIELDS.iter().find(|(k, _)| *k == key) {
            match &value {
                RawValue::Text(text) => match normalize_pdf_date(text) {
                    Some(ts) => raw.insert(*field, ts),
                    None => tracing::warn!(field = *field, value = %text, "skipping unparseable pdf date"),
                },
                _ => tracing::warn!(field = *field, "skipping non-string pdf date"),
            }
            continue;
        }

        match INFO_TEXT_FIELDS.iter().find(|(k, _)| *k == key) {
            Some((_, field)) => raw.insert(*field, value),
            None => {
                insert_custom_field(raw, info_field_name(key), value);
            }
        }
    }
}

fn first_page_preview(doc: &Document, page_number: u32, max_chars: usize) -> Option<String> {
    match doc.extract_text(&[page_number]) {
        Ok(text) => preview(&text, max_chars),
        Err(e) => {
            tracing::debug!(error = %e, "first page text not extractable");
            None
        }
    }
}

pub fn extract_pdf(path: &Path, opts: &ExtractOptions) -> AppResult<RawMetadata> {
    let doc = Document::load(path).map_err(|e| {
        AppError::extraction(
            "failed to parse pdf",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;

    let pages = doc.get_pages();
    let Some(first_page) = pages.keys().next().copied() else {
        return Err(AppError::extraction(
            "pdf has no pages",
            serde_json::json!({ "path": path }),
        ));
    };

    let mut raw = RawMetadata::new();
    insert_info(&doc, &mut raw);
    raw.insert("page_count", pages.len());
    raw.insert_text("pdf_version", non_empty(&doc.version));
    raw.insert("encrypted", doc.trailer.get(b"Encrypt").is_ok());
    raw.insert_text(
        "first_page_preview",
        first_page_preview(&doc, first_page, opts.preview_chars),
    );
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf16_and_latin1_strings() {
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x4A, 0x00, 0xE9]), "Jé");
        assert_eq!(decode_pdf_string(b"Jane Doe"), "Jane Doe");
        assert_eq!(decode_pdf_string(&[0x4A, 0xE9]), "Jé");
    }

    #[test]
    fn custom_info_keys_are_prefixed() {
        assert_eq!(info_field_name(b"Company"), "info_company");
        assert_eq!(info_field_name(b"Source-URL"), "info_source_url");
    }

    #[test]
    fn colliding_custom_keys_keep_both_values() {
        let mut raw = RawMetadata::new();
        let first = insert_custom_field(&mut raw, info_field_name(b"Source-URL"), RawValue::from("a"));
        let second = insert_custom_field(&mut raw, info_field_name(b"Source_URL"), RawValue::from("b"));
        let third = insert_custom_field(&mut raw, info_field_name(b"Source.URL"), RawValue::from("c"));
        assert_eq!(first, "info_source_url");
        assert_eq!(second, "info_source_url_2");
        assert_eq!(third, "info_source_url_3");
        assert_eq!(raw.get_text("info_source_url"), Some("a"));
        assert_eq!(raw.get_text("info_source_url_2"), Some("b"));
    }
}

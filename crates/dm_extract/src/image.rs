use crate::text::non_empty;
use crate::timestamps::normalize_exif_datetime;
use dm_core::app_error::{AppError, AppResult};
use dm_core::types::{RawMetadata, RawValue};
use exif::{Exif, Field, In, Tag, Value};
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const MAX_UNDEFINED_BYTES: usize = 64;
const DATE_TAGS: [Tag; 3] = [Tag::DateTime, Tag::DateTimeOriginal, Tag::DateTimeDigitized];

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        other => format!("{other:?}").to_ascii_lowercase(),
    }
}

pub fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "L;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;32F",
        ColorType::Rgba32F => "RGBA;32F",
        _ => "unknown",
    }
}

/// `exif_<TagName>`, with anything outside `[A-Za-z0-9_]` replaced.
pub fn exif_field_name(tag: Tag) -> String {
    let name: String = tag
        .to_string()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("exif_{}", name.trim_end_matches('_'))
}

fn ascii_text(parts: &[Vec<u8>]) -> Option<String> {
    let joined = parts
        .iter()
        .map(|p| String::from_utf8_lossy(p).trim_end_matches(char::from(0)).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    non_empty(&joined)
}

fn exif_value(field: &Field, exif: &Exif) -> Option<RawValue> {
    match &field.value {
        Value::Ascii(parts) => ascii_text(parts).map(RawValue::Text),
        Value::Short(v) if v.len() == 1 => Some(RawValue::Integer(i64::from(v[0]))),
        Value::Long(v) if v.len() == 1 => Some(RawValue::Integer(i64::from(v[0]))),
        Value::Undefined(bytes, _) if bytes.len() > MAX_UNDEFINED_BYTES => None,
        _ => non_empty(&field.display_value().with_unit(exif).to_string()).map(RawValue::Text),
    }
}

fn read_exif(path: &Path) -> AppResult<Option<Exif>> {
    let file = File::open(path).map_err(|e| {
        AppError::extraction(
            "failed to open image file",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "ignoring unreadable exif block");
            Ok(None)
        }
    }
}

fn insert_exif(exif: &Exif, raw: &mut RawMetadata) {
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        if field.tag == Tag::MakerNote {
            continue;
        }
        let name = exif_field_name(field.tag);
        let Some(value) = exif_value(field, exif) else {
            continue;
        };

        if DATE_TAGS.contains(&field.tag) {
            let RawValue::Text(text) = &value else {
                continue;
            };
            match normalize_exif_datetime(text) {
                Some(ts) => raw.insert(name, ts),
                None => tracing::warn!(field = %name, value = %text, "skipping unparseable exif timestamp"),
            }
            continue;
        }
        raw.insert(name, value);
    }
}

pub fn extract_image(path: &Path) -> AppResult<RawMetadata> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| {
            AppError::extraction(
                "failed to open image file",
                serde_json::json!({ "error": e.to_string(), "path": path }),
            )
        })?;
    let format = reader.format().ok_or_else(|| {
        AppError::extraction(
            "image format not recognized",
            serde_json::json!({ "path": path }),
        )
    })?;
    let decoder = reader.into_decoder().map_err(|e| {
        AppError::extraction(
            "failed to decode image header",
            serde_json::json!({ "error": e.to_string(), "path": path }),
        )
    })?;
    let (width, height) = decoder.dimensions();
    let color = decoder.color_type();
    drop(decoder);

    let mut raw = RawMetadata::new();
    raw.insert("format", format_name(format));
    raw.insert("width", width);
    raw.insert("height", height);
    raw.insert("size", format!("{width}x{height}"));
    raw.insert("mode", color_mode(color));

    if let Some(exif) = read_exif(path)? {
        insert_exif(&exif, &mut raw);
    }
    Ok(raw)
}

//! Shared reading of Office Open XML packages (docx, xlsx, pptx).
//!
//! A package is a zip archive of XML parts. The descriptive fields live in
//! `docProps/core.xml` (Dublin Core) and `docProps/app.xml` (application
//! statistics); both are optional parts.

use crate::text::non_empty;
use crate::timestamps::normalize_w3cdtf;
use dm_core::app_error::{AppError, AppResult};
use dm_core::types::{RawMetadata, RawValue};
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;
use zip::result::ZipError;
use zip::ZipArchive;

pub const CORE_PART: &str = "docProps/core.xml";
pub const APP_PART: &str = "docProps/app.xml";

/// Core property element name (local part) and the field it is reported as.
const CORE_TEXT_FIELDS: &[(&str, &str)] = &[
    ("title", "title"),
    ("subject", "subject"),
    ("creator", "author"),
    ("keywords", "keywords"),
    ("description", "description"),
    ("lastModifiedBy", "last_modified_by"),
    ("category", "category"),
];

const CORE_DATE_FIELDS: &[(&str, &str)] = &[("created", "created"), ("modified", "modified")];

pub struct OoxmlPackage {
    archive: ZipArchive<BufReader<File>>,
    label: &'static str,
}

fn leaf_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<(?:[\w.-]+:)?([\w.-]+)(?:\s[^>]*)?>([^<]*)</(?:[\w.-]+:)?[\w.-]+>")
            .expect("valid regex")
    })
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#x[0-9A-Fa-f]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("valid regex"))
}

/// Resolves the five predefined XML entities and numeric character references.
pub fn unescape_xml(input: &str) -> String {
    entity_re()
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") => u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

/// Text content of leaf elements keyed by local name; the first occurrence wins.
pub fn leaf_elements(xml: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for cap in leaf_element_re().captures_iter(xml) {
        out.entry(cap[1].to_string())
            .or_insert_with(|| unescape_xml(&cap[2]));
    }
    out
}

impl OoxmlPackage {
    pub fn open(path: &Path, label: &'static str) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::extraction(
                &format!("failed to open {label} file"),
                serde_json::json!({ "error": e.to_string(), "path": path }),
            )
        })?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            AppError::extraction(
                &format!("{label} file is not a valid zip package"),
                serde_json::json!({ "error": e.to_string(), "path": path }),
            )
        })?;
        Ok(Self { archive, label })
    }

    /// Reads a part as UTF-8 text, `None` when the package has no such part.
    pub fn read_part(&mut self, name: &str) -> AppResult<Option<String>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(AppError::extraction(
                    &format!("failed to open {} part", self.label),
                    serde_json::json!({ "error": e.to_string(), "part": name }),
                ))
            }
        };
        let mut text = String::new();
        entry.read_to_string(&mut text).map_err(|e| {
            AppError::extraction(
                &format!("failed to read {} part", self.label),
                serde_json::json!({ "error": e.to_string(), "part": name }),
            )
        })?;
        Ok(Some(text))
    }

    /// Reads a part the format cannot do without.
    pub fn require_part(&mut self, name: &str) -> AppResult<String> {
        self.read_part(name)?.ok_or_else(|| {
            AppError::extraction(
                &format!("{} package is missing a required part", self.label),
                serde_json::json!({ "part": name }),
            )
        })
    }

    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Core and app properties shared by every OOXML format.
    pub fn insert_properties(&mut self, raw: &mut RawMetadata) -> AppResult<HashMap<String, String>> {
        if let Some(core) = self.read_part(CORE_PART)? {
            let fields = leaf_elements(&core);
            for (element, field) in CORE_TEXT_FIELDS {
                raw.insert_text(*field, fields.get(*element).and_then(|v| non_empty(v)));
            }
            for (element, field) in CORE_DATE_FIELDS {
                if let Some(value) = fields.get(*element).and_then(|v| non_empty(v)) {
                    match normalize_w3cdtf(&value) {
                        Some(ts) => raw.insert(*field, ts),
                        None => tracing::warn!(field = *field, value = %value, "skipping unparseable ooxml timestamp"),
                    }
                }
            }
            if let Some(revision) = fields.get("revision").and_then(|v| v.trim().parse::<i64>().ok()) {
                raw.insert("revision", RawValue::Integer(revision));
            }
        }

        let app = match self.read_part(APP_PART)? {
            Some(xml) => leaf_elements(&xml),
            None => HashMap::new(),
        };
        raw.insert_text("application", app.get("Application").and_then(|v| non_empty(v)));
        Ok(app)
    }
}

pub fn app_integer(app: &HashMap<String, String>, element: &str) -> Option<i64> {
    app.get(element).and_then(|v| v.trim().parse::<i64>().ok())
}

//! Canonical form of extracted metadata.
//!
//! Every value is rendered to text through one fixed encoding per type and the
//! entries are ordered by the byte order of their field names, so two raw
//! mappings holding the same pairs always produce the same canonical form.

use crate::app_error::{AppError, AppResult};
use crate::canon_json::to_canonical_string;
use crate::types::{RawMetadata, RawValue};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const FLOAT_PRECISION: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMetadata {
    entries: BTreeMap<String, String>,
}

impl CanonicalMetadata {
    /// Builds canonical metadata from already rendered pairs; a repeated name keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The byte sequence the metadata hash is computed over.
    ///
    /// One `name=value` line per entry. Backslash, CR and LF are escaped in
    /// names and values, and `=` in names, so every line boundary and the first
    /// `=` of a line are real separators.
    pub fn to_lines(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            push_escaped(&mut out, name, true);
            out.push('=');
            push_escaped(&mut out, value, false);
            out.push('\n');
        }
        out
    }

    /// Canonical JSON object, as stored in the `metadata` column.
    pub fn to_json(&self) -> AppResult<String> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        to_canonical_string(&Value::Object(map))
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            AppError::new(
                "DM_RECORD_CORRUPT",
                "store",
                "stored metadata is not valid json",
                false,
                serde_json::json!({ "error": e.to_string() }),
            )
        })?;
        let Value::Object(map) = value else {
            return Err(AppError::new(
                "DM_RECORD_CORRUPT",
                "store",
                "stored metadata must be a json object",
                false,
                serde_json::json!({}),
            ));
        };

        let mut entries = BTreeMap::new();
        for (name, value) in map {
            match value {
                Value::String(text) => {
                    entries.insert(name, text);
                }
                other => {
                    return Err(AppError::new(
                        "DM_RECORD_CORRUPT",
                        "store",
                        "stored metadata values must be strings",
                        false,
                        serde_json::json!({ "field": name, "value": other }),
                    ))
                }
            }
        }
        Ok(Self { entries })
    }
}

fn push_escaped(out: &mut String, text: &str, is_name: bool) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '=' if is_name => out.push_str("\\="),
            other => out.push(other),
        }
    }
}

pub fn normalize(raw: &RawMetadata) -> CanonicalMetadata {
    let entries = raw
        .iter()
        .filter_map(|(name, value)| render_value(value).map(|text| (name.clone(), text)))
        .collect();
    CanonicalMetadata { entries }
}

/// Text encoding of one value; `None` for null and blank text, which are dropped from the canonical form.
pub fn render_value(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(text) => {
            let trimmed = text.trim_end();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        RawValue::Integer(n) => Some(n.to_string()),
        RawValue::Float(f) => Some(render_float(*f)),
        RawValue::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        RawValue::Null => None,
    }
}

/// Fixed precision with trailing zeros removed: 1.50 -> "1.5", 2.0 -> "2", -0.0 -> "0".
pub fn render_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let fixed = format!("{:.*}", FLOAT_PRECISION, f);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rendering_has_no_trailing_zero_ambiguity() {
        assert_eq!(render_float(1.5), "1.5");
        assert_eq!(render_float(2.0), "2");
        assert_eq!(render_float(-0.0), "0");
        assert_eq!(render_float(0.1 + 0.2), "0.3");
        assert_eq!(render_float(100.0), "100");
        assert_eq!(render_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn text_keeps_leading_whitespace_and_drops_trailing() {
        assert_eq!(
            render_value(&RawValue::Text("  Jane Doe \t\n".to_string())),
            Some("  Jane Doe".to_string())
        );
    }

    #[test]
    fn blank_text_is_omitted() {
        assert_eq!(render_value(&RawValue::from("   ")), None);
        assert_eq!(render_value(&RawValue::from("")), None);
    }

    #[test]
    fn null_is_omitted() {
        let raw: RawMetadata = vec![("a", RawValue::Null), ("b", RawValue::Bool(false))]
            .into_iter()
            .collect();
        let canonical = normalize(&raw);
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical.get("b"), Some("false"));
    }
}

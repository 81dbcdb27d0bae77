use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Image,
    Email,
    Csv,
}

impl FormatTag {
    pub const ALL: [FormatTag; 7] = [
        FormatTag::Pdf,
        FormatTag::Docx,
        FormatTag::Xlsx,
        FormatTag::Pptx,
        FormatTag::Image,
        FormatTag::Email,
        FormatTag::Csv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Pdf => "pdf",
            FormatTag::Docx => "docx",
            FormatTag::Xlsx => "xlsx",
            FormatTag::Pptx => "pptx",
            FormatTag::Image => "image",
            FormatTag::Email => "email",
            FormatTag::Csv => "csv",
        }
    }

    /// Lowercase extensions, without the leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FormatTag::Pdf => &["pdf"],
            FormatTag::Docx => &["docx"],
            FormatTag::Xlsx => &["xlsx"],
            FormatTag::Pptx => &["pptx"],
            FormatTag::Image => &["jpg", "jpeg", "png"],
            FormatTag::Email => &["eml"],
            FormatTag::Csv => &["csv"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<FormatTag> {
        let lowered = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.extensions().contains(&lowered.as_str()))
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .flat_map(|tag| tag.extensions().iter().copied())
            .collect()
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

impl From<usize> for RawValue {
    fn from(value: usize) -> Self {
        RawValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

/// Field name to value, as produced by one extraction call. Insertion order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata(HashMap<String, RawValue>);

impl RawMetadata {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Absent optional fields are left out entirely, never stored as "".
    pub fn insert_text(&mut self, name: impl Into<String>, value: Option<String>) {
        if let Some(text) = value {
            if !text.trim().is_empty() {
                self.0.insert(name.into(), RawValue::Text(text));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(RawValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, RawValue> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a RawMetadata {
    type Item = (&'a String, &'a RawValue);
    type IntoIter = hash_map::Iter<'a, String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataHash(pub String);

impl MetadataHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetadataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

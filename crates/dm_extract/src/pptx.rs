use crate::ooxml::OoxmlPackage;
use dm_core::app_error::AppResult;
use dm_core::types::RawMetadata;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

fn slide_part_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ppt/slides/slide\d+\.xml$").expect("valid regex"))
}

pub fn count_slides<'a>(part_names: impl IntoIterator<Item = &'a str>) -> usize {
    part_names
        .into_iter()
        .filter(|name| slide_part_re().is_match(name))
        .count()
}

pub fn extract_pptx(path: &Path) -> AppResult<RawMetadata> {
    let mut package = OoxmlPackage::open(path, "pptx")?;
    package.require_part(PRESENTATION_PART)?;

    let mut raw = RawMetadata::new();
    package.insert_properties(&mut raw)?;

    let parts = package.part_names();
    raw.insert("slide_count", count_slides(parts.iter().map(String::as_str)));
    Ok(raw)
}

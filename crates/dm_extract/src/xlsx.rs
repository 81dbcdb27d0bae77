use crate::ooxml::{unescape_xml, OoxmlPackage};
use dm_core::app_error::AppResult;
use dm_core::canon_json::string_list;
use dm_core::types::RawMetadata;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const WORKBOOK_PART: &str = "xl/workbook.xml";

fn sheet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<(?:\w+:)?sheet\s[^>]*?\bname="([^"]*)""#).expect("valid regex")
    })
}

/// Sheet names in workbook order.
pub fn sheet_names(workbook_xml: &str) -> Vec<String> {
    sheet_re()
        .captures_iter(workbook_xml)
        .map(|cap| unescape_xml(&cap[1]))
        .collect()
}

pub fn extract_xlsx(path: &Path) -> AppResult<RawMetadata> {
    let mut package = OoxmlPackage::open(path, "xlsx")?;
    let workbook = package.require_part(WORKBOOK_PART)?;

    let mut raw = RawMetadata::new();
    package.insert_properties(&mut raw)?;

    let names = sheet_names(&workbook);
    raw.insert("sheet_count", names.len());
    raw.insert("sheet_names", string_list(&names)?);
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_in_order_with_entities() {
        let xml = r#"<workbook><sheets><sheet name="Q1 &amp; Q2" sheetId="1" r:id="rId1"/><sheet sheetId="2" name="Totals" r:id="rId2"/></sheets></workbook>"#;
        assert_eq!(sheet_names(xml), vec!["Q1 & Q2".to_string(), "Totals".to_string()]);
    }

    #[test]
    fn sheets_container_is_not_a_sheet() {
        assert!(sheet_names("<sheets></sheets>").is_empty());
    }
}

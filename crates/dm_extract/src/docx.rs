use crate::extractor::ExtractOptions;
use crate::ooxml::{app_integer, unescape_xml, OoxmlPackage};
use crate::text::preview;
use dm_core::app_error::AppResult;
use dm_core::types::RawMetadata;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const DOCUMENT_PART: &str = "word/document.xml";

fn paragraph_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<w:p(?:\s[^>]*)?/?>").expect("valid regex"))
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:p(?:\s[^>]*)?>(.*?)</w:p>").expect("valid regex"))
}

fn run_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("valid regex"))
}

/// Paragraphs in the main document body, self-closing empty ones included.
pub fn count_paragraphs(document_xml: &str) -> usize {
    paragraph_open_re().find_iter(document_xml).count()
}

/// Text of the first paragraph that has any.
pub fn first_paragraph_text(document_xml: &str) -> Option<String> {
    paragraph_re().captures_iter(document_xml).find_map(|para| {
        let text: String = run_text_re()
            .captures_iter(&para[1])
            .map(|run| unescape_xml(&run[1]))
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    })
}

pub fn extract_docx(path: &Path, opts: &ExtractOptions) -> AppResult<RawMetadata> {
    let mut package = OoxmlPackage::open(path, "docx")?;
    let document = package.require_part(DOCUMENT_PART)?;

    let mut raw = RawMetadata::new();
    let app = package.insert_properties(&mut raw)?;

    raw.insert("paragraph_count", count_paragraphs(&document));
    if let Some(pages) = app_integer(&app, "Pages") {
        raw.insert("page_count", pages);
    }
    if let Some(words) = app_integer(&app, "Words") {
        raw.insert("word_count", words);
    }
    raw.insert_text(
        "text_preview",
        first_paragraph_text(&document).and_then(|t| preview(&t, opts.preview_chars)),
    );
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<w:document><w:body><w:p/><w:p w:rsidR="1"><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Annual</w:t></w:r><w:r><w:t xml:space="preserve"> report &amp; notes</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p></w:body></w:document>"#;

    #[test]
    fn counts_paragraphs_but_not_paragraph_properties() {
        assert_eq!(count_paragraphs(BODY), 3);
    }

    #[test]
    fn first_paragraph_joins_runs() {
        assert_eq!(
            first_paragraph_text(BODY).as_deref(),
            Some("Annual report & notes")
        );
    }
}

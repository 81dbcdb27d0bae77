use crate::delimited::extract_csv;
use crate::docx::extract_docx;
use crate::email::extract_email;
use crate::image::extract_image;
use crate::pdf::extract_pdf;
use crate::pptx::extract_pptx;
use crate::xlsx::extract_xlsx;
use dm_core::app_error::AppResult;
use dm_core::config::ExtractConfig;
use dm_core::services::MetadataExtractor;
use dm_core::types::{FormatTag, RawMetadata};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub preview_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&ExtractConfig::default())
    }
}

impl From<&ExtractConfig> for ExtractOptions {
    fn from(cfg: &ExtractConfig) -> Self {
        Self {
            preview_chars: cfg.preview_chars,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultExtractor {
    pub options: ExtractOptions,
}

impl DefaultExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }
}

impl MetadataExtractor for DefaultExtractor {
    fn extract(&self, path: &Path, format: FormatTag) -> AppResult<RawMetadata> {
        tracing::debug!(path = %path.display(), format = %format, "extracting metadata");
        let raw = match format {
            FormatTag::Pdf => extract_pdf(path, &self.options),
            FormatTag::Docx => extract_docx(path, &self.options),
            FormatTag::Xlsx => extract_xlsx(path),
            FormatTag::Pptx => extract_pptx(path),
            FormatTag::Image => extract_image(path),
            FormatTag::Email => extract_email(path),
            FormatTag::Csv => extract_csv(path),
        }?;
        tracing::debug!(path = %path.display(), fields = raw.len(), "extracted metadata");
        Ok(raw)
    }
}

pub mod delimited;
pub mod detect;
pub mod docx;
pub mod email;
pub mod extractor;
pub mod image;
pub mod ooxml;
pub mod pdf;
pub mod pipeline;
pub mod pptx;
pub mod text;
pub mod timestamps;
pub mod xlsx;

pub use detect::detect;
pub use extractor::{DefaultExtractor, ExtractOptions};
pub use pipeline::{extract_metadata, extract_metadata_with, ExtractedMetadata};

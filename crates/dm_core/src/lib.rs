pub mod app_error;
pub mod canon_json;
pub mod config;
pub mod db;
pub mod hashing;
pub mod normalize;
pub mod services;
pub mod store;
pub mod types;

pub use app_error::{AppError, AppResult};
pub use normalize::{normalize, CanonicalMetadata};
pub use store::{MetadataStore, Record};
pub use types::{FormatTag, MetadataHash, RawMetadata, RawValue};

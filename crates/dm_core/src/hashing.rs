use crate::app_error::{AppError, AppResult};
use crate::normalize::CanonicalMetadata;
use crate::types::MetadataHash;
use sha2::{Digest, Sha256};

pub const METADATA_HASH_HEX_LEN: usize = 64;

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    bytes_to_hex(&Sha256::digest(bytes))
}

/// SHA-256 over the `name=value\n` serialization of the canonical metadata.
pub fn digest(canonical: &CanonicalMetadata) -> MetadataHash {
    MetadataHash(sha256_hex(canonical.to_lines().as_bytes()))
}

pub fn validate_metadata_hash(s: &str) -> AppResult<()> {
    if s.len() != METADATA_HASH_HEX_LEN {
        return Err(AppError::new(
            "DM_HASH_INVALID_FORMAT",
            "hash",
            "metadata hash must be 64 hex characters",
            false,
            serde_json::json!({ "value": s, "len": s.len() }),
        ));
    }
    if !s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
        return Err(AppError::new(
            "DM_HASH_INVALID_FORMAT",
            "hash",
            "metadata hash must be lowercase hex",
            false,
            serde_json::json!({ "value": s }),
        ));
    }
    Ok(())
}

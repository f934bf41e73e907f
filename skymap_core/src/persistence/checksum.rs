//! Checksum of a snapshot payload.
//!
//! The digest is taken over the compact JSON encoding of the payload, so two
//! payloads that compare equal as [`Value`]s always share a checksum.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::StoreResult;

/// Hex-encoded SHA-256 of `payload` in compact JSON form.
pub fn calculate_checksum(payload: &Value) -> StoreResult<String> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, payload)?;
    Ok(hex::encode(hasher.finalize()))
}

//! Stable diagram identifiers.
//!
//! The instance id is derived from the document and the diagram's position
//! in it, so it survives re-renders. The session id appends the view's
//! render generation, so a theme change never reuses ids inside engine
//! output.

use sha2::{Digest, Sha256};

const INSTANCE_PREFIX: &str = "diagram-";
const HASH_LEN: usize = 12;

/// Instance id: `diagram-` + 12 hex chars of SHA-256 over `"{document}:{index}"`.
#[must_use]
pub fn instance_id(document_key: &str, index: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{document_key}:{index}").as_bytes());
    let hash = hex::encode(hasher.finalize());
    format!("{INSTANCE_PREFIX}{}", &hash[..HASH_LEN])
}

/// Session id for render generation `nonce` of `instance`.
#[must_use]
pub fn session_id(instance: &str, nonce: u64) -> String {
    format!("{instance}-{nonce}")
}

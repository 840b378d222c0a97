//! Stable hashing for fragment ids

use sha2::{Digest, Sha256};

/// 16-hex-char id derived from a fragment's position and its content.
///
/// Hashes at most the first 1000 characters of the content, sliced on char
/// boundaries, so ids stay cheap to compute for very large fragments.
pub fn stable_hash(content: &str, seq: usize) -> String {
    let content_prefix: String = content.chars().take(1000).collect();
    let mut hasher = Sha256::new();
    hasher.update(format!("{seq}:{content_prefix}").as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")[..16].to_string()
}

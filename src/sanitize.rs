//! Filesystem-safe names
//!
//! Every path derived from user-supplied text goes through [`sanitize`].
//! [`cache_key`] adds a short content hash whenever sanitizing was lossy, so two
//! different queries can never share a cache file.

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Used when a name sanitizes down to nothing
pub const FALLBACK_NAME: &str = "untitled";

lazy_static! {
    static ref FORBIDDEN: Regex = Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("valid regex");
}

/// Replace forbidden characters with `_`, trim whitespace, then drop trailing dots and spaces.
pub fn sanitize(name: &str) -> String {
    let replaced = FORBIDDEN.replace_all(name, "_");
    replaced
        .trim()
        .trim_end_matches(['.', ' '])
        .to_string()
}

/// File stem for a cache artifact keyed by `name`.
///
/// Names that survive sanitizing unchanged are used as-is. Anything else gets an
/// 8-hex-digit SHA-256 suffix of the original text.
pub fn cache_key(name: &str) -> String {
    let safe = sanitize(name);
    if !safe.is_empty() && safe == name {
        return safe;
    }

    let stem = if safe.is_empty() {
        FALLBACK_NAME
    } else {
        safe.as_str()
    };
    format!("{}-{}", stem, short_hash(name))
}

fn short_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)[..8].to_string()
}

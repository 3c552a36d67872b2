// Cache key derivation from request parameters

use crate::models::{CaptionColor, CaptionRequest};
use sha2::{Digest, Sha256};

/// Deterministic digest of a caption request, used as the sole cache key.
///
/// Stored as 64 lowercase hex characters. There is deliberately no version
/// component: changing the rendering algorithm silently stales old entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 fingerprint of a request.
///
/// Pure and total. Fields are hashed in a fixed order, each preceded by its
/// byte length, so a delimiter occurring inside a caption can never shift
/// field boundaries ("a|b","c" and "a","b|c" hash differently).
pub fn fingerprint(req: &CaptionRequest) -> Fingerprint {
    let mut hasher = Sha256::new();

    for field in [&req.source_url, &req.top_text, &req.bottom_text] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.update([match req.color {
        CaptionColor::Black => 0u8,
        CaptionColor::White => 1u8,
    }]);

    Fingerprint(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(source: &str, top: &str, bottom: &str, color: CaptionColor) -> CaptionRequest {
        CaptionRequest::new(source, top, bottom, color)
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint(&req("http://x/a.png", "TOP", "BOTTOM", CaptionColor::Black));
        let b = fingerprint(&req("http://x/a.png", "TOP", "BOTTOM", CaptionColor::Black));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_hex_shape() {
        let fp = fingerprint(&req("http://x/a.png", "", "", CaptionColor::Black));
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_each_field_contributes() {
        let base = fingerprint(&req("u", "t", "b", CaptionColor::Black));
        assert_ne!(base, fingerprint(&req("u2", "t", "b", CaptionColor::Black)));
        assert_ne!(base, fingerprint(&req("u", "t2", "b", CaptionColor::Black)));
        assert_ne!(base, fingerprint(&req("u", "t", "b2", CaptionColor::Black)));
        assert_ne!(base, fingerprint(&req("u", "t", "b", CaptionColor::White)));
    }

    #[test]
    fn test_field_boundaries_unambiguous() {
        // A separator inside a field must not collide with the field split.
        let a = fingerprint(&req("u", "a|b", "c", CaptionColor::Black));
        let b = fingerprint(&req("u", "a", "b|c", CaptionColor::Black));
        assert_ne!(a, b);

        let c = fingerprint(&req("u", "ab", "", CaptionColor::Black));
        let d = fingerprint(&req("u", "a", "b", CaptionColor::Black));
        assert_ne!(c, d);
    }
}

//! SHA-256 digests for snapshots
//!
//! All digests are lowercase hex (64 characters). Comparison against a
//! published digest is case-insensitive.

use super::canonical::{canonical_schema_bytes, normalize_line_endings};
use super::ColumnSpec;
use sha2::{Digest, Sha256};

/// Algorithm label carried in provenance messages
pub const HASH_ALGO: &str = "SHA-256";

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Content hash of raw bytes after canonicalization
///
/// Used by verification on resolved storage bytes; equals
/// `Snapshot::content_hash` for bytes the builder produced.
pub fn canonical_content_hash(raw: &[u8]) -> String {
    sha256_hex(&normalize_line_endings(raw))
}

/// Schema hash over the ordered column list
pub fn schema_hash(columns: &[ColumnSpec]) -> String {
    sha256_hex(&canonical_schema_bytes(columns))
}

/// Case-insensitive hex digest comparison
pub fn hashes_match(expected: &str, actual: &str) -> bool {
    expected.eq_ignore_ascii_case(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_canonical_hash_ignores_crlf() {
        assert_eq!(
            canonical_content_hash(b"id\r\n1\r\n"),
            canonical_content_hash(b"id\n1\n")
        );
    }

    #[test]
    fn test_schema_hash_is_order_sensitive() {
        let a = schema_hash(&[ColumnSpec::named("id"), ColumnSpec::named("name")]);
        let b = schema_hash(&[ColumnSpec::named("name"), ColumnSpec::named("id")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hashes_match_is_case_insensitive() {
        let h = sha256_hex(b"x");
        assert!(hashes_match(&h.to_uppercase(), &h));
        assert!(!hashes_match(&h, &sha256_hex(b"y")));
    }
}

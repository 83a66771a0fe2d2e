//! Content hashing via xxh3.

use xxhash_rust::xxh3::{xxh3_128, xxh3_64};

/// Compute the xxh3 64-bit hash of file content.
#[inline]
pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// Compute the xxh3 128-bit hash, rendered as 32 lowercase hex chars.
pub fn hash_hex128(content: &[u8]) -> String {
    format!("{:032x}", xxh3_128(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_hash() {
        let data = b"hello world";
        assert_eq!(hash_content(data), hash_content(data));
        assert_eq!(hash_hex128(data), hash_hex128(data));
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(hash_content(b"hello"), hash_content(b"world"));
        assert_ne!(hash_hex128(b"hello"), hash_hex128(b"world"));
    }

    #[test]
    fn hex128_is_fixed_width() {
        assert_eq!(hash_hex128(b"").len(), 32);
        assert_eq!(hash_hex128(b"x").len(), 32);
    }
}

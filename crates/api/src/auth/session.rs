//! Opaque session tokens.
//!
//! The client receives a random UUID v4 string as its `sessionId`; the
//! database only stores its SHA-256 hex digest, so a leaked table cannot be
//! replayed.

use sha2::{Digest, Sha256};

/// Generate a new session token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. Send the plaintext to the
/// client and persist only the hash.
pub fn generate_session_token() -> (String, String) {
    let plaintext = uuid::Uuid::new_v4().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a presented token, for lookup.
pub fn hash_session_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_sha256_hex() {
        let (plaintext, hash) = generate_session_token();
        assert_eq!(hash, hash_session_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        let (a, _) = generate_session_token();
        let (b, _) = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_session_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

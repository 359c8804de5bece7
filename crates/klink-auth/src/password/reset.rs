//! One-time password reset tokens.
//!
//! The raw token is mailed to the user; only its SHA-256 digest is stored.

use sha2::{Digest, Sha256};

/// A newly generated reset token.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Hex token sent to the user.
    pub raw: String,
    /// Hex SHA-256 of `raw`, persisted on the user row.
    pub digest: String,
}

impl ResetToken {
    /// Generate 32 random bytes, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::fill(&mut bytes[..]);
        let raw = hex::encode(bytes);
        let digest = Self::digest(&raw);
        Self { raw, digest }
    }

    /// Digest of a token presented on the reset route.
    pub fn digest(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let token = ResetToken::generate();
        assert_eq!(token.raw.len(), 64);
        assert_eq!(token.digest.len(), 64);
        assert_eq!(ResetToken::digest(&token.raw), token.digest);
        assert_ne!(token.raw, ResetToken::generate().raw);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            ResetToken::digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

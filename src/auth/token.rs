//! Bearer token verification.

use sha2::{Digest, Sha256};

/// Decides whether a presented bearer token grants access.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> bool;
}

/// Verifier for a single shared secret configured at startup.
///
/// Only the SHA-256 digest of the secret is kept in memory.
#[derive(Clone)]
pub struct StaticTokenVerifier {
    digest: String,
}

impl StaticTokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Self::hash_token(secret),
        }
    }

    /// Hash a token for comparison.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> bool {
        Self::hash_token(token) == self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_verification() {
        let verifier = StaticTokenVerifier::new("mysecrettoken123");

        assert!(verifier.verify("mysecrettoken123"));
        assert!(!verifier.verify("mysecrettoken12"));
        assert!(!verifier.verify("MYSECRETTOKEN123"));
        assert!(!verifier.verify(""));
    }

    #[test]
    fn test_digest_is_not_the_secret() {
        let verifier = StaticTokenVerifier::new("hunter2");
        assert_ne!(verifier.digest, "hunter2");
        assert_eq!(verifier.digest.len(), 64);
    }
}

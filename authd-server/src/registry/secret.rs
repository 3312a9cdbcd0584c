use sha2::{Digest, Sha256};

/// Stored verifier for a client secret.
///
/// Secrets are never kept in plaintext: the registry holds the SHA-256
/// digest of the secret and verification digests the presented value and
/// compares digests in constant time. Configuration may supply either the
/// hex digest directly or a plaintext secret that is digested at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretHash([u8; 32]);

impl SecretHash {
    /// Digest a plaintext secret into its stored form.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        Self(digest.into())
    }

    /// Parse a hex-encoded SHA-256 digest (64 hex characters).
    pub fn from_hex(hex_digest: &str) -> Result<Self, String> {
        let bytes = hex::decode(hex_digest)
            .map_err(|e| format!("invalid hex digest: {e}"))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| "digest must be exactly 32 bytes".to_string())?;
        Ok(Self(digest))
    }

    /// Check a presented secret against the stored digest.
    ///
    /// Runtime does not depend on how many digest bytes match.
    pub fn verify(&self, presented: &str) -> bool {
        let presented = Sha256::digest(presented.as_bytes());
        constant_time_eq(&self.0, &presented.into())
    }
}

/// Fixed-time comparison of two equal-length digests.
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_correct_secret() {
        let hash = SecretHash::from_secret("my-secret");
        assert!(hash.verify("my-secret"));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let hash = SecretHash::from_secret("my-secret");
        assert!(!hash.verify("my-secret2"));
        assert!(!hash.verify(""));
        assert!(!hash.verify("MY-SECRET"));
    }

    #[test]
    fn test_from_hex_round_trip() {
        let hash = SecretHash::from_secret("my-secret");
        let hex_digest = hex::encode(hash.0);
        let parsed = SecretHash::from_hex(&hex_digest).expect("valid digest");
        assert_eq!(hash, parsed);
        assert!(parsed.verify("my-secret"));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(SecretHash::from_hex("not hex").is_err());
        // Valid hex but wrong length
        assert!(SecretHash::from_hex("deadbeef").is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [7u8; 32];
        let mut b = a;
        assert!(constant_time_eq(&a, &b));
        b[31] ^= 1;
        assert!(!constant_time_eq(&a, &b));
    }
}

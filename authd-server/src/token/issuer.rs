//! JWT access-token issuance and verification.

use crate::config::TokenConfig;
use crate::registry::RegisteredClient;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during token operations
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid signing key: {0}")]
    Key(String),
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    Invalid,
}

/// Claims embedded in every issued access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer identifier
    pub iss: String,
    /// Subject: the authenticated client_id
    pub sub: String,
    /// Granted scopes, space-joined
    pub scope: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Random token id; makes every issuance distinct
    pub jti: String,
}

impl AccessClaims {
    /// Granted scopes as a list.
    pub fn scopes(&self) -> Vec<String> {
        self.scope.split_whitespace().map(str::to_string).collect()
    }
}

/// A freshly minted access token, alive until serialized into the response.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed token value
    pub value: String,
    /// Issued-at, seconds since the Unix epoch
    pub issued_at: i64,
    /// Expiry, seconds since the Unix epoch
    pub expires_at: i64,
    /// Scopes actually granted
    pub granted_scopes: Vec<String>,
}

impl IssuedToken {
    /// Remaining lifetime at issuance, in seconds.
    pub fn expires_in(&self) -> u64 {
        (self.expires_at - self.issued_at) as u64
    }
}

/// Signs and verifies access tokens.
///
/// Key material is loaded once at startup and shared read-only across all
/// requests; rotation is not supported.
pub struct TokenIssuer {
    issuer: String,
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer from configuration, reading RSA PEM files if needed.
    pub fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        match config.algorithm.as_str() {
            "HS256" => {
                let secret = config
                    .hs256_secret
                    .as_deref()
                    .ok_or_else(|| TokenError::Key("HS256 secret is not set".to_string()))?;
                Self::new_hs256(&config.issuer, secret.as_bytes())
            }
            "RS256" => {
                let private_path = config.rsa_private_key_file.as_deref().ok_or_else(|| {
                    TokenError::Key("RS256 private key file is not set".to_string())
                })?;
                let public_path = config.rsa_public_key_file.as_deref().ok_or_else(|| {
                    TokenError::Key("RS256 public key file is not set".to_string())
                })?;
                let private_pem = std::fs::read(private_path)
                    .map_err(|e| TokenError::Key(format!("read {private_path}: {e}")))?;
                let public_pem = std::fs::read(public_path)
                    .map_err(|e| TokenError::Key(format!("read {public_path}: {e}")))?;
                Self::new_rs256(&config.issuer, &private_pem, &public_pem)
            }
            other => Err(TokenError::Key(format!("unsupported algorithm '{other}'"))),
        }
    }

    /// Create an issuer signing with HS256 and a shared secret.
    pub fn new_hs256(issuer: &str, secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < 32 {
            return Err(TokenError::Key(
                "HS256 secret must be at least 32 bytes".to_string(),
            ));
        }
        Ok(Self {
            issuer: issuer.to_string(),
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Create an issuer signing with RS256 and an RSA key pair.
    pub fn new_rs256(
        issuer: &str,
        private_key_pem: &[u8],
        public_key_pem: &[u8],
    ) -> Result<Self, TokenError> {
        Ok(Self {
            issuer: issuer.to_string(),
            algorithm: Algorithm::RS256,
            encoding_key: EncodingKey::from_rsa_pem(private_key_pem)
                .map_err(|e| TokenError::Key(format!("invalid RSA private key: {e}")))?,
            decoding_key: DecodingKey::from_rsa_pem(public_key_pem)
                .map_err(|e| TokenError::Key(format!("invalid RSA public key: {e}")))?,
        })
    }

    /// Issuer identifier embedded in every token.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Mint a signed access token for an authenticated, validated grant.
    ///
    /// `expires_at > issued_at` holds for every registered client because
    /// TTL positivity is enforced at registration time.
    pub fn issue(
        &self,
        client: &RegisteredClient,
        granted_scopes: &[String],
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let issued_at = now.timestamp();
        let expires_at = issued_at + client.token_ttl.as_secs() as i64;
        let jti = hex::encode(rand::thread_rng().gen::<[u8; 16]>());

        let claims = AccessClaims {
            iss: self.issuer.clone(),
            sub: client.client_id.clone(),
            scope: granted_scopes.join(" "),
            iat: issued_at,
            exp: expires_at,
            jti,
        };

        let value = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        debug!(
            "issued token for client '{}' with {} scopes, expires in {}s",
            client.client_id,
            granted_scopes.len(),
            client.token_ttl.as_secs()
        );

        Ok(IssuedToken {
            value,
            issued_at,
            expires_at,
            granted_scopes: granted_scopes.to_vec(),
        })
    }

    /// Verify a presented token: signature, expiry and issuer.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        let data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                debug!("token verification failed: {e}");
                TokenError::Invalid
            })?;
        Ok(data.claims)
    }
}

//! Token signing configuration

use confique::Config;

/// Token issuance configuration
#[derive(Debug, Config, Clone)]
pub struct TokenConfig {
    /// Issuer identifier embedded in every access token and advertised in
    /// the server metadata document (default: "http://localhost:7766")
    #[config(env = "AUTHD_TOKEN_ISSUER", default = "http://localhost:7766")]
    pub issuer: String,

    /// Signing algorithm: "HS256" or "RS256" (default: "HS256")
    #[config(env = "AUTHD_TOKEN_ALGORITHM", default = "HS256")]
    pub algorithm: String,

    /// Shared secret for HS256, at least 32 bytes
    #[config(env = "AUTHD_TOKEN_HS256_SECRET")]
    pub hs256_secret: Option<String>,

    /// Path to the RSA private key PEM for RS256
    #[config(env = "AUTHD_TOKEN_RSA_PRIVATE_KEY_FILE")]
    pub rsa_private_key_file: Option<String>,

    /// Path to the RSA public key PEM for RS256
    #[config(env = "AUTHD_TOKEN_RSA_PUBLIC_KEY_FILE")]
    pub rsa_public_key_file: Option<String>,
}

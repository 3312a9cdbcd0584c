pub(crate) use crate::config::registry::RegistryConfig;
pub(crate) use crate::config::security::SecurityConfig;
pub(crate) use crate::config::token::TokenConfig;
use confique::Config;
use url::Url;

pub mod registry;
pub mod security;
pub mod token;

/// Main configuration structure for the authd server
///
/// Values layer environment variables over an optional `authd.toml` file,
/// with the defaults below as the last resort. `validate` runs once at
/// startup; the process refuses to start on an inconsistent configuration.
#[derive(Debug, Config, Clone)]
pub struct AuthdConfig {
    /// The port the server will listen to (default: 7766)
    #[config(env = "AUTHD_PORT", default = 7766)]
    pub port: u16,

    /// Client registry configuration
    #[config(nested)]
    pub registry: RegistryConfig,

    /// Token issuance configuration
    #[config(nested)]
    pub token: TokenConfig,

    /// Security boundary configuration
    #[config(nested)]
    pub security: SecurityConfig,
}

impl AuthdConfig {
    /// Load configuration from the environment and `authd.toml`.
    pub fn load() -> Result<Self, confique::Error> {
        Self::builder().env().file("authd.toml").load()
    }

    /// Cross-field validation, run once at startup.
    ///
    /// Per-client validation (empty ids, TTLs, grant types) happens when the
    /// registry is built from `registry.clients`.
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.token.issuer)
            .map_err(|e| format!("token.issuer is not a valid URL: {e}"))?;

        match self.token.algorithm.as_str() {
            "HS256" => match &self.token.hs256_secret {
                None => return Err("HS256 requires token.hs256_secret".to_string()),
                Some(secret) if secret.len() < 32 => {
                    return Err("token.hs256_secret must be at least 32 bytes".to_string());
                }
                Some(_) => {}
            },
            "RS256" => {
                if self.token.rsa_private_key_file.is_none()
                    || self.token.rsa_public_key_file.is_none()
                {
                    return Err(
                        "RS256 requires token.rsa_private_key_file and token.rsa_public_key_file"
                            .to_string(),
                    );
                }
            }
            other => return Err(format!("unsupported token.algorithm '{other}'")),
        }

        if self.registry.lookup_timeout_ms == 0 {
            return Err("registry.lookup_timeout_ms must be strictly positive".to_string());
        }

        Ok(())
    }
}

use self::secret::SecretHash;
use crate::config::registry::ClientEntry;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod secret;

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid client configuration: {0}")]
    Config(String),
    /// Covers both an unknown client id and a wrong secret. Callers must
    /// not be able to tell the two apart.
    #[error("client authentication failed")]
    InvalidCredentials,
    #[error("client store unavailable: {0}")]
    #[allow(dead_code)]
    Unavailable(String),
}

/// Grant types a registered client may be allowed to use.
///
/// This server implements exactly the client-credentials grant; the tag set
/// exists so registrations stay explicit about what they permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    ClientCredentials,
}

impl GrantType {
    /// The RFC 6749 grant_type parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::ClientCredentials => "client_credentials",
        }
    }

    fn parse(tag: &str) -> Result<Self, String> {
        match tag {
            "client_credentials" => Ok(GrantType::ClientCredentials),
            other => Err(format!("unknown grant type '{other}'")),
        }
    }
}

/// A registered OAuth 2.0 client.
///
/// Immutable after registration: there is no runtime mutation API, and all
/// fields are validated eagerly when the record is built from configuration.
#[derive(Debug, Clone)]
pub struct RegisteredClient {
    /// Registration id, assigned when the record is created.
    pub id: Uuid,
    /// Client identifier presented during authentication. Unique within the
    /// registry.
    pub client_id: String,
    /// Verifier for the client secret.
    pub secret: SecretHash,
    /// Grant types this client may use.
    pub allowed_grant_types: Vec<GrantType>,
    /// Scopes this client may be granted.
    pub allowed_scopes: Vec<String>,
    /// Lifetime of access tokens issued to this client.
    pub token_ttl: Duration,
}

impl RegisteredClient {
    /// Build and validate a client record from a configuration entry.
    ///
    /// Fails fast on anything a later request would otherwise trip over:
    /// empty id, missing or ambiguous secret, unknown grant types, and a
    /// non-positive token TTL (issuance assumes `expires_at > issued_at`).
    pub fn from_entry(entry: &ClientEntry) -> Result<Self, RegistryError> {
        let client_id = entry.client_id.trim();
        if client_id.is_empty() {
            return Err(RegistryError::Config("client_id must not be empty".into()));
        }

        let secret = match (&entry.client_secret, &entry.client_secret_sha256) {
            (Some(_), Some(_)) => {
                return Err(RegistryError::Config(format!(
                    "client '{client_id}': set client_secret or client_secret_sha256, not both"
                )));
            }
            (Some(plain), None) => SecretHash::from_secret(plain),
            (None, Some(digest)) => SecretHash::from_hex(digest)
                .map_err(|e| RegistryError::Config(format!("client '{client_id}': {e}")))?,
            (None, None) => {
                return Err(RegistryError::Config(format!(
                    "client '{client_id}': a client secret is required"
                )));
            }
        };

        if entry.grant_types.is_empty() {
            return Err(RegistryError::Config(format!(
                "client '{client_id}': at least one grant type is required"
            )));
        }
        let mut allowed_grant_types = Vec::with_capacity(entry.grant_types.len());
        for tag in &entry.grant_types {
            let grant = GrantType::parse(tag)
                .map_err(|e| RegistryError::Config(format!("client '{client_id}': {e}")))?;
            if !allowed_grant_types.contains(&grant) {
                allowed_grant_types.push(grant);
            }
        }

        let mut allowed_scopes = Vec::with_capacity(entry.scopes.len());
        for scope in &entry.scopes {
            let scope = scope.trim();
            if scope.is_empty() {
                return Err(RegistryError::Config(format!(
                    "client '{client_id}': scopes must not be empty strings"
                )));
            }
            if !allowed_scopes.iter().any(|s| s == scope) {
                allowed_scopes.push(scope.to_string());
            }
        }

        if entry.token_ttl_secs == 0 {
            return Err(RegistryError::Config(format!(
                "client '{client_id}': token_ttl_secs must be strictly positive"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            client_id: client_id.to_string(),
            secret,
            allowed_grant_types,
            allowed_scopes,
            token_ttl: Duration::from_secs(entry.token_ttl_secs),
        })
    }
}

/// Contract for registered-client stores.
///
/// The in-memory registry is the reference implementation; a durable store
/// implements the same two operations and must keep at most one
/// authoritative record per client_id. Implementations must be safe under
/// unbounded concurrent readers.
#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    /// Resolve a client by exact id. No partial or case-insensitive
    /// matching.
    async fn lookup(&self, client_id: &str) -> Result<Option<RegisteredClient>, RegistryError>;

    /// Resolve and authenticate a client with a presented secret.
    ///
    /// Returns `RegistryError::InvalidCredentials` for both an unknown id
    /// and a secret mismatch, with no distinguishing signal in the error or
    /// its timing profile.
    async fn authenticate(
        &self,
        client_id: &str,
        presented_secret: &str,
    ) -> Result<RegisteredClient, RegistryError>;
}

//! Client registry configuration

use confique::Config;
use serde::{Deserialize, Serialize};

/// A registered-client definition.
///
/// Entries come from the `[[registry.clients]]` array of the TOML file or,
/// as a JSON array, from `AUTHD_REGISTRY_CLIENTS`. Validation happens when
/// the registry is built: ids must be unique and non-empty, grant types
/// known, and the token TTL strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEntry {
    /// Client identifier used in authentication
    pub client_id: String,
    /// Plaintext secret, digested at load time. Prefer
    /// `client_secret_sha256` so the secret never appears in configuration.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Hex-encoded SHA-256 digest of the client secret
    #[serde(default)]
    pub client_secret_sha256: Option<String>,
    /// Grant types this client may use (only "client_credentials" is known)
    pub grant_types: Vec<String>,
    /// Scopes this client may be granted
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Access token lifetime in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    3600
}

/// Registry configuration
#[derive(Debug, Config, Clone)]
pub struct RegistryConfig {
    /// Registered clients (JSON array when set via environment)
    #[config(env = "AUTHD_REGISTRY_CLIENTS", parse_env = parse_clients_json, default = [])]
    pub clients: Vec<ClientEntry>,

    /// Upper bound on a single store lookup, in milliseconds. The in-memory
    /// store never comes close; a network-backed store must not hang a
    /// token request indefinitely.
    #[config(env = "AUTHD_REGISTRY_LOOKUP_TIMEOUT_MS", default = 5000)]
    pub lookup_timeout_ms: u64,
}

fn parse_clients_json(raw: &str) -> Result<Vec<ClientEntry>, serde_json::Error> {
    serde_json::from_str(raw)
}

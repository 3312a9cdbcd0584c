use crate::config::AuthdConfig;
use crate::registry::memory::InMemoryRegistry;
use crate::registry::ClientStore;
use crate::token::grant::GrantValidator;
use crate::token::issuer::TokenIssuer;
use log::info;
use std::sync::Arc;

/// Shared application state, cloned per request.
///
/// This is the composition root: every component is built here, in order,
/// at process start. All fields are read-only after construction and shared
/// via `Arc`, so concurrent requests need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AuthdConfig>,
    pub registry: Arc<dyn ClientStore>,
    pub validator: Arc<GrantValidator>,
    pub issuer: Arc<TokenIssuer>,
    /// Union of all registered clients' allowed scopes, advertised in the
    /// server metadata document.
    pub advertised_scopes: Arc<Vec<String>>,
}

impl AppState {
    /// Build the full component graph from a validated configuration.
    pub fn new(config: AuthdConfig) -> Result<Self, String> {
        let registry =
            InMemoryRegistry::from_entries(&config.registry.clients).map_err(|e| e.to_string())?;
        info!("client registry loaded with {} clients", registry.len());

        let issuer = TokenIssuer::from_config(&config.token).map_err(|e| e.to_string())?;
        info!("token issuer ready, issuer id '{}'", issuer.issuer());

        let advertised_scopes = advertised_scopes(&config);

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            validator: Arc::new(GrantValidator::new()),
            issuer: Arc::new(issuer),
            advertised_scopes: Arc::new(advertised_scopes),
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("advertised_scopes", &self.advertised_scopes)
            .finish_non_exhaustive()
    }
}

/// Union of client scopes, first-seen order, no duplicates.
fn advertised_scopes(config: &AuthdConfig) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for client in &config.registry.clients {
        for scope in &client.scopes {
            let scope = scope.trim();
            if !scope.is_empty() && !scopes.iter().any(|s| s == scope) {
                scopes.push(scope.to_string());
            }
        }
    }
    scopes
}

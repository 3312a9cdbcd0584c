//! Grant validation for the token endpoint.

use crate::registry::{GrantType, RegisteredClient};

/// Why a grant request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantRejection {
    /// The grant type is not `client_credentials` or the client is not
    /// allowed to use it.
    UnsupportedGrantType,
    /// The requested scopes share nothing with the client's allowed scopes.
    InvalidScope,
}

/// A request that passed all grant checks, ready for token issuance.
#[derive(Debug, Clone)]
pub struct ValidatedGrant {
    pub client: RegisteredClient,
    pub granted_scopes: Vec<String>,
}

/// Validates a parsed token request against the authenticated client.
///
/// The checks run as a fixed pipeline: grant type first, then scopes, so a
/// request that is wrong on both counts always reports the grant-type error.
/// The terminal state carries the client and the granted scope set forward
/// to the issuer.
#[derive(Debug, Default)]
pub struct GrantValidator;

impl GrantValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run the request through the validation pipeline.
    ///
    /// `scope` is the raw space-separated request parameter; absent or blank
    /// means the client is asking for everything it is allowed.
    pub fn validate(
        &self,
        client: &RegisteredClient,
        grant_type: &str,
        scope: Option<&str>,
    ) -> Result<ValidatedGrant, GrantRejection> {
        // Grant type: must be the client-credentials literal and the client
        // must be registered for it.
        if grant_type != GrantType::ClientCredentials.as_str() {
            return Err(GrantRejection::UnsupportedGrantType);
        }
        if !client
            .allowed_grant_types
            .contains(&GrantType::ClientCredentials)
        {
            return Err(GrantRejection::UnsupportedGrantType);
        }

        // Scopes: empty request defaults to the full allowed set; otherwise
        // grant the intersection, failing closed when it is empty.
        let requested: Vec<&str> = scope
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default();
        let granted_scopes = if requested.is_empty() {
            client.allowed_scopes.clone()
        } else {
            let granted: Vec<String> = client
                .allowed_scopes
                .iter()
                .filter(|allowed| requested.contains(&allowed.as_str()))
                .cloned()
                .collect();
            if granted.is_empty() {
                return Err(GrantRejection::InvalidScope);
            }
            granted
        };

        Ok(ValidatedGrant {
            client: client.clone(),
            granted_scopes,
        })
    }
}

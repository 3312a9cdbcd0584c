use super::{ClientStore, RegisteredClient, RegistryError};
use crate::config::registry::ClientEntry;
use crate::registry::secret::SecretHash;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;

/// In-memory reference implementation of [`ClientStore`].
///
/// Built once from static configuration at process start and read-only for
/// the process lifetime, so concurrent lookups need no locking.
#[derive(Debug)]
pub struct InMemoryRegistry {
    clients: HashMap<String, RegisteredClient>,
    /// Digest burned on unknown-id authentication so the miss path does the
    /// same work as a secret mismatch.
    dummy: SecretHash,
}

impl InMemoryRegistry {
    /// Build the registry from configuration entries, validating each record
    /// and enforcing client_id uniqueness.
    pub fn from_entries(entries: &[ClientEntry]) -> Result<Self, RegistryError> {
        let mut clients = HashMap::with_capacity(entries.len());
        for entry in entries {
            let client = RegisteredClient::from_entry(entry)?;
            if clients.contains_key(&client.client_id) {
                return Err(RegistryError::Config(format!(
                    "duplicate client_id '{}'",
                    client.client_id
                )));
            }
            debug!(
                "registered client '{}' (registration id {})",
                client.client_id, client.id
            );
            clients.insert(client.client_id.clone(), client);
        }
        Ok(Self {
            clients,
            dummy: SecretHash::from_secret("00000000-0000-0000-0000-000000000000"),
        })
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }
}

#[async_trait]
impl ClientStore for InMemoryRegistry {
    async fn lookup(&self, client_id: &str) -> Result<Option<RegisteredClient>, RegistryError> {
        Ok(self.clients.get(client_id).cloned())
    }

    async fn authenticate(
        &self,
        client_id: &str,
        presented_secret: &str,
    ) -> Result<RegisteredClient, RegistryError> {
        match self.lookup(client_id).await? {
            Some(client) if client.secret.verify(presented_secret) => Ok(client),
            Some(_) => Err(RegistryError::InvalidCredentials),
            None => {
                // Unknown id: verify against the dummy digest anyway.
                self.dummy.verify(presented_secret);
                Err(RegistryError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GrantType;

    fn entry(client_id: &str) -> ClientEntry {
        ClientEntry {
            client_id: client_id.to_string(),
            client_secret: Some("my-secret".to_string()),
            client_secret_sha256: None,
            grant_types: vec!["client_credentials".to_string()],
            scopes: vec!["openid".to_string()],
            token_ttl_secs: 3600,
        }
    }

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::from_entries(&[entry("my-client")]).expect("valid registry")
    }

    #[tokio::test]
    async fn test_lookup_exact_match_only() {
        let registry = registry();

        let found = registry.lookup("my-client").await.unwrap();
        assert!(found.is_some());
        let client = found.unwrap();
        assert_eq!(client.client_id, "my-client");
        assert_eq!(client.allowed_grant_types, vec![GrantType::ClientCredentials]);
        assert_eq!(client.allowed_scopes, vec!["openid"]);
        assert_eq!(client.token_ttl.as_secs(), 3600);

        // No case-insensitive or partial matching
        assert!(registry.lookup("MY-CLIENT").await.unwrap().is_none());
        assert!(registry.lookup("my-client ").await.unwrap().is_none());
        assert!(registry.lookup("my").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let registry = registry();
        let client = registry
            .authenticate("my-client", "my-secret")
            .await
            .expect("authentication should succeed");
        assert_eq!(client.client_id, "my-client");
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let registry = registry();

        let wrong_secret = registry.authenticate("my-client", "nope").await;
        let unknown_client = registry.authenticate("who-is-this", "my-secret").await;

        assert!(matches!(wrong_secret, Err(RegistryError::InvalidCredentials)));
        assert!(matches!(unknown_client, Err(RegistryError::InvalidCredentials)));
        // Identical user-visible rendering for both failure shapes
        assert_eq!(
            wrong_secret.unwrap_err().to_string(),
            unknown_client.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_secret_digest_entry() {
        let mut e = entry("digest-client");
        e.client_secret = None;
        // SHA-256 of "my-secret"
        e.client_secret_sha256 = Some(
            "186ef76e9d6a723ecb570d4d9c287487d001e5d35f7ed4a313350a407950318e".to_string(),
        );
        let registry = InMemoryRegistry::from_entries(&[e]).expect("valid registry");
        assert!(registry.authenticate("digest-client", "my-secret").await.is_ok());
    }

    #[test]
    fn test_rejects_duplicate_client_id() {
        let err = InMemoryRegistry::from_entries(&[entry("a"), entry("a")]).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_empty_client_id() {
        let err = InMemoryRegistry::from_entries(&[entry("  ")]).unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let mut e = entry("a");
        e.token_ttl_secs = 0;
        let err = InMemoryRegistry::from_entries(&[e]).unwrap_err();
        assert!(err.to_string().contains("token_ttl_secs"));
    }

    #[test]
    fn test_rejects_unknown_grant_type() {
        let mut e = entry("a");
        e.grant_types = vec!["authorization_code".to_string()];
        let err = InMemoryRegistry::from_entries(&[e]).unwrap_err();
        assert!(err.to_string().contains("unknown grant type"));
    }

    #[test]
    fn test_rejects_missing_and_ambiguous_secret() {
        let mut missing = entry("a");
        missing.client_secret = None;
        assert!(InMemoryRegistry::from_entries(&[missing]).is_err());

        let mut both = entry("b");
        both.client_secret_sha256 = Some("ab".repeat(32));
        assert!(InMemoryRegistry::from_entries(&[both]).is_err());
    }

    #[test]
    fn test_dedups_scopes_preserving_order() {
        let mut e = entry("a");
        e.scopes = vec![
            "openid".to_string(),
            "profile".to_string(),
            "openid".to_string(),
        ];
        let registry = InMemoryRegistry::from_entries(&[e]).unwrap();
        let client = registry.clients.get("a").unwrap();
        assert_eq!(client.allowed_scopes, vec!["openid", "profile"]);
        assert_eq!(registry.len(), 1);
    }
}

use crate::config::registry::ClientEntry;
use crate::config::{AuthdConfig, RegistryConfig, SecurityConfig, TokenConfig};
use crate::create_app;
use crate::registry::RegisteredClient;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

/// Test fixture that runs the complete application in-process.
///
/// The default configuration registers the reference client
/// (`my-client` / `my-secret`, client_credentials, scope `openid`, 1 hour
/// TTL) and signs tokens with a fixed HS256 test key, so tests can exercise
/// the real router, middleware and handlers with `tower::oneshot` and no
/// sockets.
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// The shared state behind the router
    pub state: AppState,
}

impl TestFixture {
    /// The default test configuration: one registered reference client.
    pub fn config() -> AuthdConfig {
        AuthdConfig {
            port: 0,
            registry: RegistryConfig {
                clients: vec![ClientEntry {
                    client_id: "my-client".to_string(),
                    client_secret: Some("my-secret".to_string()),
                    client_secret_sha256: None,
                    grant_types: vec!["client_credentials".to_string()],
                    scopes: vec!["openid".to_string()],
                    token_ttl_secs: 3600,
                }],
                lookup_timeout_ms: 5000,
            },
            token: TokenConfig {
                issuer: "http://localhost:7766".to_string(),
                algorithm: "HS256".to_string(),
                hs256_secret: Some("test-signing-secret-0123456789abcdef".to_string()),
                rsa_private_key_file: None,
                rsa_public_key_file: None,
            },
            security: SecurityConfig {
                allowed_origins: vec![],
            },
        }
    }

    /// Creates a fixture with the default test configuration.
    pub async fn new() -> Self {
        Self::with_config(Self::config()).await
    }

    /// Creates a fixture with a customized configuration.
    pub async fn with_config(config: AuthdConfig) -> Self {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        config.validate().expect("test config should be valid");
        let state = AppState::new(config).expect("test state should build");
        let app = create_app(state.clone()).await;
        Self { app, state }
    }

    /// HTTP Basic Authorization header value for the given credentials.
    pub fn basic(client_id: &str, client_secret: &str) -> String {
        format!(
            "Basic {}",
            BASE64.encode(format!("{client_id}:{client_secret}"))
        )
    }

    /// Mint a token for the first configured client directly through the
    /// issuer, bypassing the endpoint. Useful for exercising protected
    /// resources in isolation.
    pub fn issue_token(&self, scopes: &[&str]) -> String {
        let entry = &self.state.config.registry.clients[0];
        let client = RegisteredClient::from_entry(entry).expect("fixture client is valid");
        let scopes: Vec<String> = scopes.iter().map(|s| s.to_string()).collect();
        self.state
            .issuer
            .issue(&client, &scopes, Utc::now())
            .expect("issuance should succeed")
            .value
    }

    /// Sends a GET request with the given extra headers.
    pub async fn get(&self, uri: impl AsRef<str>, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri.as_ref());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a GET request authenticated with a bearer token.
    pub async fn get_with_bearer(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        self.get(uri, &[("Authorization", &format!("Bearer {token}"))])
            .await
    }

    /// Sends a POST with a form-encoded body and the given extra headers.
    pub async fn post_form(
        &self,
        uri: impl AsRef<str>,
        headers: &[(&str, &str)],
        form: &[(&str, &str)],
    ) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri.as_ref())
            .header("Content-Type", "application/x-www-form-urlencoded");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Parse as JSON, defaulting to an empty object for empty or
        // non-JSON bodies
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }
}

/// Response from a test request with convenient access to status, headers
/// and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// A response header as a string, if present.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Converts the response body to the specified type.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}

//! Endpoint classification: the routing/authorization boundary.
//!
//! Every inbound path falls into exactly one of two classes. Protocol
//! endpoints implement the OAuth 2.0 exchange itself (plus the operational
//! surface that must work before any token exists); they take no prior
//! authentication at the router level and are exempt from the cross-site
//! check, because client authentication happens inline during the grant
//! exchange. Everything else is a protected resource and must present a
//! valid bearer token before any handler logic runs.

/// The token issuance path.
pub const TOKEN_PATH: &str = "/oauth2/token";

/// RFC 8414 authorization-server metadata path.
pub const METADATA_PATH: &str = "/.well-known/oauth-authorization-server";

/// Fixed, ordered matcher list for the protocol-endpoint class,
/// established at startup. The cross-site exemption applies to exactly
/// these paths and no other.
const PROTOCOL_MATCHERS: &[&str] = &[
    TOKEN_PATH,
    METADATA_PATH,
    "/openapi.json",
    "/scalar",
    "/healthy",
];

/// Classification of an inbound request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// OAuth protocol or operational endpoint: authentication (if any)
    /// happens inline, no cross-site check.
    Protocol,
    /// Application resource: requires a pre-established bearer identity.
    Protected,
}

/// Classify a request path. Matching is exact; the first matcher wins.
pub fn classify(path: &str) -> EndpointClass {
    if PROTOCOL_MATCHERS.iter().any(|m| *m == path) {
        EndpointClass::Protocol
    } else {
        EndpointClass::Protected
    }
}

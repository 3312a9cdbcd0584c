//! Request-security configuration

use confique::Config;
use std::convert::Infallible;

/// Security boundary configuration
#[derive(Debug, Config, Clone)]
pub struct SecurityConfig {
    /// Origins allowed to make state-changing cross-site requests to
    /// protected resources. Requests carrying any other Origin header are
    /// rejected before authentication. Protocol endpoints are exempt.
    /// Comma-separated when set via environment.
    #[config(env = "AUTHD_SECURITY_ALLOWED_ORIGINS", parse_env = parse_origin_list, default = [])]
    pub allowed_origins: Vec<String>,
}

fn parse_origin_list(raw: &str) -> Result<Vec<String>, Infallible> {
    Ok(raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_list() {
        let origins = parse_origin_list(" https://a.example ,, https://b.example ").unwrap();
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
        assert!(parse_origin_list("").unwrap().is_empty());
    }
}

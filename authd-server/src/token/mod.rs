//! Token issuance: grant validation and JWT signing.

pub mod grant;
pub mod issuer;

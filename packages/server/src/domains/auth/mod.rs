//! Auth domain - verifies the bearer tokens issued by the SKTAI auth service
//!
//! Responsibilities:
//! - JWT verification (HS256, issuer check)
//! - Mapping claims to the `Actor` domain operations run as

pub mod jwt;

pub use jwt::{Claims, JwtService};

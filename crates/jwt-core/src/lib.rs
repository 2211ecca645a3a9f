//! JSON Web Token issuance, signing, verification, revocation and refresh.
//!
//! The entry point is [`service::TokenService`], which is parameterised over a
//! [`service::TokenPolicy`] describing which issuers, audiences and algorithms
//! the embedding application trusts. [`config::TrustConfig`] is a ready-made
//! policy loaded from environment variables.

#![warn(clippy::pedantic)]

/// Module for signing algorithms and the `Signer` capability
pub mod algorithm;

/// Module for the untyped claim bag shared by header and payload
pub mod claims;

/// Module for Base64URL and JSON wire encoding
pub mod codec;

/// Module for trust configuration loaded from the environment
pub mod config;

/// Module for error types
pub mod errors;

/// Module for the JOSE header view
pub mod header;

/// Module for the revocation ledger
pub mod ledger;

/// Module for metrics emitted by the engine
pub mod observability;

/// Module for the registered and private payload claims
pub mod payload;

/// Module for the mixed-algorithm policy guard
pub mod policy;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for the token service and its trust policy
pub mod service;

/// Module for tokens and their structural and temporal checks
pub mod token;

/// Module for the expiring user cache
pub mod user_cache;

pub use algorithm::{Algorithm, AlgorithmFamily, Signer};
pub use claims::{ClaimBag, ClaimValue};
pub use errors::JwtError;
pub use header::Header;
pub use payload::Payload;
pub use service::{TokenPolicy, TokenService};
pub use token::Token;

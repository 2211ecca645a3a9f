//! # JWT Test Utilities
//!
//! Shared test utilities for `jwt-core`.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed HMAC secret, seeded Ed25519 keys)
//! - A test policy with a controllable clock (TestPolicy)
//! - Raw token builders for forging adversarial wire strings (RawTokenBuilder)
//! - Fixed test identifiers (issuers, audiences, subjects)
//! - Custom assertions on wire strings (WireAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jwt_test_utils::*;
//!
//! #[test]
//! fn test_example() {
//!     let service = TokenService::new(TestPolicy::hmac()).unwrap();
//!     let mut token = service.issue(/* ... */).unwrap();
//!     let wire = service.sign_and_encode(Some(TEST_HMAC_SECRET), &mut token).unwrap();
//!
//!     wire.assert_wire_format()
//!         .assert_header_alg("HS256")
//!         .assert_claim_str("sub", TEST_SUBJECT);
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod test_ids;
pub mod test_policy;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use test_ids::*;
pub use test_policy::*;
pub use token_builders::*;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwt_core=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

//! Algorithm policy guard.
//!
//! A verifier that accepts both an HMAC algorithm and a public-key algorithm is
//! open to algorithm confusion: an attacker rewrites `alg` to an HMAC id and
//! signs with the verifier's public key, which the verifier then uses as the
//! shared secret. [`assert_not_mixed_algorithms`] refuses such configurations.
//!
//! # Limitations
//!
//! Detection is enumeration based. Only the members of
//! [`Algorithm::hmac_algorithms`] and [`Algorithm::key_algorithms`] are
//! probed; an allow-list predicate that admits identifiers outside these two
//! families is not examined.

use crate::algorithm::{Algorithm, Signer};
use crate::errors::JwtError;

/// Fail if `is_allowed` accepts at least one HMAC algorithm and at least one
/// key based algorithm.
///
/// # Errors
///
/// Returns [`JwtError::InsecureConfiguration`] for a mixed allow-list.
pub fn assert_not_mixed_algorithms<F>(is_allowed: F) -> Result<(), JwtError>
where
    F: Fn(Option<Algorithm>) -> bool,
{
    let hmac = Algorithm::hmac_algorithms().find(|a| is_allowed(Some(*a)));
    let keyed = Algorithm::key_algorithms().find(|a| is_allowed(Some(*a)));

    if let (Some(hmac), Some(keyed)) = (hmac, keyed) {
        tracing::error!(
            target: "jwt_core.policy",
            hmac_algorithm = hmac.id(),
            key_algorithm = keyed.id(),
            "Insecure configuration: HMAC and key based algorithms are both allowed"
        );
        return Err(JwtError::InsecureConfiguration);
    }

    Ok(())
}

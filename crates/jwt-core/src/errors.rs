//! Error types for token issuance, signing and configuration.
//!
//! Only caller-contract violations surface as [`JwtError`]. Failures caused by
//! untrusted input (a presented wire string) never become errors; they are
//! collapsed to `None` by [`crate::service::TokenService::validate`] so that
//! token holders cannot learn why a token was refused.

use thiserror::Error;

/// Errors returned to the embedding application.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// A required argument was missing or violated an ordering rule.
    #[error("{0}")]
    InvalidArgument(String),

    /// No secret could be resolved for signing.
    #[error("Secret cannot be null")]
    MissingSecret,

    /// The token header does not name a known algorithm.
    #[error("Token algorithm is missing or unknown")]
    MissingAlgorithm,

    /// The signing primitive rejected the key material.
    #[error("Signing error: {0}")]
    Signing(String),

    /// JSON or Base64 encoding failed.
    #[error("Codec error: {0}")]
    Codec(String),

    /// The allowed-algorithm predicate accepts both HMAC and key based algorithms.
    #[error(
        "Insecure configuration detected. JWT verification must never permit \
         both HMAC and key based signatures at the same time."
    )]
    InsecureConfiguration,
}

impl JwtError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Reasons a presented wire string was refused.
///
/// Never returned to callers. Each variant maps to a bounded metric label and a
/// debug log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    TooLarge,
    Malformed,
    Revoked,
    NotJwt,
    AlgorithmNotAllowed,
    MissingSecret,
    BadSignature,
    Undecodable,
    FailedValidation,
}

impl Rejection {
    /// Metric label for this rejection.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Rejection::TooLarge => "too_large",
            Rejection::Malformed => "malformed",
            Rejection::Revoked => "revoked",
            Rejection::NotJwt => "not_jwt",
            Rejection::AlgorithmNotAllowed => "algorithm_not_allowed",
            Rejection::MissingSecret => "missing_secret",
            Rejection::BadSignature => "bad_signature",
            Rejection::Undecodable => "undecodable",
            Rejection::FailedValidation => "failed_validation",
        }
    }

    /// Diagnostic text for the debug log.
    pub(crate) fn message(self) -> &'static str {
        match self {
            Rejection::TooLarge => "Token rejected: size exceeds maximum allowed",
            Rejection::Malformed => "Token parsed to null",
            Rejection::Revoked => "Token is revoked by signature",
            Rejection::NotJwt => "Not a JWT token",
            Rejection::AlgorithmNotAllowed => "Token algorithm is not allowed",
            Rejection::MissingSecret => "Unable to locate token secret",
            Rejection::BadSignature => "Token signature is not valid",
            Rejection::Undecodable => "Error validating token",
            Rejection::FailedValidation => "Token failed data validation",
        }
    }
}

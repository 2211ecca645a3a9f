//! Trust configuration loaded from environment variables.
//!
//! | Variable                  | Required | Meaning                                         |
//! |---------------------------|----------|-------------------------------------------------|
//! | `JWT_TRUSTED_ISSUERS`     | yes      | comma separated issuers                         |
//! | `JWT_AUDIENCE`            | yes      | default audience for validation                 |
//! | `JWT_ALLOWED_ALGORITHMS`  | yes      | comma separated algorithm ids                   |
//! | `JWT_SIGNING_SECRET`      | no       | standard Base64 signing key                     |
//! | `JWT_VERIFICATION_SECRET` | no       | standard Base64 verify key, defaults to signing |

use crate::algorithm::Algorithm;
use crate::header::Header;
use crate::secret::{secret_from_base64, secret_from_bytes, ExposeSecret, SecretSlice};
use crate::service::TokenPolicy;
use std::collections::{BTreeSet, HashMap};
use std::env;
use thiserror::Error;

pub const TRUSTED_ISSUERS_VAR: &str = "JWT_TRUSTED_ISSUERS";
pub const AUDIENCE_VAR: &str = "JWT_AUDIENCE";
pub const ALLOWED_ALGORITHMS_VAR: &str = "JWT_ALLOWED_ALGORITHMS";
pub const SIGNING_SECRET_VAR: &str = "JWT_SIGNING_SECRET";
pub const VERIFICATION_SECRET_VAR: &str = "JWT_VERIFICATION_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Environment variable {0} must not be empty")]
    EmptyValue(String),

    #[error("Unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Base64 decode error in {var}: {source}")]
    Base64Error {
        var: String,
        #[source]
        source: base64::DecodeError,
    },
}

/// Trusted issuers, default audience, allowed algorithms and default secrets.
///
/// Secrets are redacted from `Debug`.
#[derive(Debug)]
pub struct TrustConfig {
    issuers: BTreeSet<String>,
    audience: String,
    allowed_algorithms: BTreeSet<Algorithm>,
    signing_secret: Option<SecretSlice<u8>>,
    verification_secret: Option<SecretSlice<u8>>,
}

impl TrustConfig {
    #[must_use]
    pub fn new<I, S>(issuers: I, audience: &str, allowed_algorithms: &[Algorithm]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            issuers: issuers.into_iter().map(Into::into).collect(),
            audience: audience.to_string(),
            allowed_algorithms: allowed_algorithms.iter().copied().collect(),
            signing_secret: None,
            verification_secret: None,
        }
    }

    #[must_use]
    pub fn with_signing_secret(mut self, secret: &[u8]) -> Self {
        self.signing_secret = Some(secret_from_bytes(secret));
        self
    }

    #[must_use]
    pub fn with_verification_secret(mut self, secret: &[u8]) -> Self {
        self.verification_secret = Some(secret_from_bytes(secret));
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// See [`TrustConfig::from_vars`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a missing or empty required variable, an unknown
    /// algorithm id, or a secret that is not valid standard Base64.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let issuers: BTreeSet<String> = split_list(required(vars, TRUSTED_ISSUERS_VAR)?)
            .map(str::to_string)
            .collect();
        if issuers.is_empty() {
            return Err(ConfigError::EmptyValue(TRUSTED_ISSUERS_VAR.to_string()));
        }

        let audience = required(vars, AUDIENCE_VAR)?.trim().to_string();
        if audience.is_empty() {
            return Err(ConfigError::EmptyValue(AUDIENCE_VAR.to_string()));
        }

        let allowed_algorithms = split_list(required(vars, ALLOWED_ALGORITHMS_VAR)?)
            .map(|id| {
                Algorithm::from_id(id).ok_or_else(|| ConfigError::UnknownAlgorithm(id.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        if allowed_algorithms.is_empty() {
            return Err(ConfigError::EmptyValue(ALLOWED_ALGORITHMS_VAR.to_string()));
        }

        let signing_secret = optional_secret(vars, SIGNING_SECRET_VAR)?;
        let verification_secret = optional_secret(vars, VERIFICATION_SECRET_VAR)?;

        tracing::debug!(
            target: "jwt_core.config",
            issuers = issuers.len(),
            algorithms = ?allowed_algorithms,
            has_signing_secret = signing_secret.is_some(),
            has_verification_secret = verification_secret.is_some(),
            "Trust configuration loaded"
        );

        Ok(Self {
            issuers,
            audience,
            allowed_algorithms,
            signing_secret,
            verification_secret,
        })
    }

    #[must_use]
    pub fn allowed_algorithms(&self) -> &BTreeSet<Algorithm> {
        &self.allowed_algorithms
    }
}

fn required<'a>(vars: &'a HashMap<String, String>, name: &str) -> Result<&'a str, ConfigError> {
    vars.get(name)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn optional_secret(
    vars: &HashMap<String, String>,
    name: &str,
) -> Result<Option<SecretSlice<u8>>, ConfigError> {
    vars.get(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            secret_from_base64(v).map_err(|source| ConfigError::Base64Error {
                var: name.to_string(),
                source,
            })
        })
        .transpose()
}

impl TokenPolicy for TrustConfig {
    fn is_algorithm_allowed(&self, algorithm: Option<Algorithm>) -> bool {
        algorithm.is_some_and(|a| self.allowed_algorithms.contains(&a))
    }

    fn issuers(&self) -> &BTreeSet<String> {
        &self.issuers
    }

    fn audience(&self) -> &str {
        &self.audience
    }

    fn sign_secret(&self, _header: &Header, secret: Option<&[u8]>) -> Option<SecretSlice<u8>> {
        secret
            .or_else(|| self.signing_secret.as_ref().map(|s| s.expose_secret()))
            .map(secret_from_bytes)
    }

    fn validate_secret(&self, _header: &Header, secret: Option<&[u8]>) -> Option<SecretSlice<u8>> {
        secret
            .or_else(|| {
                self.verification_secret
                    .as_ref()
                    .or(self.signing_secret.as_ref())
                    .map(|s| s.expose_secret())
            })
            .map(secret_from_bytes)
    }
}

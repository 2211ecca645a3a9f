//! Metrics definitions for the token engine.
//!
//! All metrics follow Prometheus naming conventions:
//! - `jwt_` prefix
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: 2 values (success, error)
//! - `error_category`: one value per validation pipeline stage, plus `none`

use metrics::{counter, gauge};

/// Record token issuance outcome
///
/// Metric: `jwt_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str) {
    counter!("jwt_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record token validation result
///
/// Metric: `jwt_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("jwt_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record a revocation
///
/// Metric: `jwt_token_revocations_total`
pub fn record_token_revocation() {
    counter!("jwt_token_revocations_total").increment(1);
}

/// Update revocation ledger size
///
/// Metric: `jwt_revocation_ledger_entries`
#[allow(clippy::cast_precision_loss)]
pub fn set_ledger_entries(count: usize) {
    gauge!("jwt_revocation_ledger_entries").set(count as f64);
}

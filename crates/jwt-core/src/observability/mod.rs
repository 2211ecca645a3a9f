//! Observability for the token engine.
//!
//! Logging uses `tracing` with `jwt_core.*` targets. Tokens, secrets and
//! subjects never appear in log fields or metric labels; rejection reasons are
//! exposed only as bounded labels.

pub mod metrics;

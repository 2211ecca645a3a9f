//! Fixed test identifiers for deterministic tests

// Issuers
pub const TEST_ISSUER: &str = "junit-ca";
pub const TEST_ISSUER_OTHER: &str = "junit-ca-2";
pub const TEST_ISSUER_UNTRUSTED: &str = "rogue-ca";

// Audiences
pub const TEST_AUDIENCE: &str = "junit-app";
pub const TEST_AUDIENCE_OTHER: &str = "junit-other-app";

// Subjects
pub const TEST_SUBJECT: &str = "user-id";
pub const TEST_SUBJECT_ADMIN: &str = "admin-id";

// Key IDs
pub const TEST_KEY_ID_1: &str = "test-key-2025-01";
pub const TEST_KEY_ID_2: &str = "test-key-2025-02";

// Permissions
pub const PERMISSION_READ: &str = "read";
pub const PERMISSION_WRITE: &str = "write";

/// Fixed "now" used by [`crate::TestPolicy`], 2023-11-14T22:13:20Z.
pub const TEST_NOW_MILLIS: i64 = 1_700_000_000_000;

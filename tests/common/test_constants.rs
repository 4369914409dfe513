//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// Account owning every route in the fixtures.
pub const ACCOUNT_ID: &str = "acct1";

/// Tunnel used by desired routes unless a scenario overrides it.
pub const TUNNEL_ID: &str = "tun-1";

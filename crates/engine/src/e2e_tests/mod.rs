//! Level-up E2E tests.
//!
//! These tests drive the full wizard flow, from open through pickers to
//! commit, against the in-memory host in `test_fixtures`.
//!
//! # Running E2E Tests
//!
//! ```bash
//! cargo test -p levelwiz-engine --lib e2e_tests
//! ```

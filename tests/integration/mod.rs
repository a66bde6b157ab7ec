//! Integration tests module
//!
//! Shared setup for the end-to-end tests: every test calls
//! [`init_test_env`] first so parser and generator logs show up in
//! failing test output.

pub mod end_to_end_test;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

//! Test support utilities for sync-secrets integration tests.
//!
//! Provides an in-memory remote, a fake clock, and binary helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

/// Binary test environment.
///
/// Commands start from a scrubbed environment so inputs set by a CI
/// runner (TARGET, SECRETS, ...) never leak into a test.
pub struct Test {
    /// Extra environment applied to every command
    pub env: Vec<(String, String)>,
}

impl Test {
    pub fn new() -> Self {
        Self { env: Vec::new() }
    }

    /// Set an environment variable for every command.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

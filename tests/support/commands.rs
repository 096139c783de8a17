//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Environment variables the binary reads.
const INPUT_VARS: &[&str] = &[
    "TARGET",
    "QUERY",
    "GITHUB_TOKEN",
    "GITHUB_API_URL",
    "TYPE",
    "ENVIRONMENT",
    "SECRETS",
    "VARIABLES",
    "PRUNE",
    "DRY_RUN",
    "RATE_LIMIT",
    "MAX_RETRIES",
    "SYNC_SECRETS_LOG",
];

impl Test {
    /// Create a sync-secrets command with a scrubbed environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sync-secrets").expect("failed to find sync-secrets binary");
        for var in INPUT_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run with the given arguments and a dummy token.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("--github-token")
            .arg("test-token")
            .args(args)
            .output()
            .expect("failed to run sync-secrets")
    }

    /// Run against an API endpoint that refuses connections.
    pub fn run_offline(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(["--github-token", "test-token", "--api-url", "http://127.0.0.1:9"])
            .args(args)
            .output()
            .expect("failed to run sync-secrets")
    }
}

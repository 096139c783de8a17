//! Shared CLI output helpers for the sync transcript.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: created, updated, success
//! - Red: deleted, errors
//! - Yellow: warnings, dry-run intent
//! - Cyan: entry names, hints
//! - Bold: repository headers
//! - Dimmed: secondary info

use std::fmt::Display;

use console::style;

use crate::core::domain::{Action, ActionKind};

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ 2 repositories synced`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("⚠").yellow(), msg);
    } else {
        println!("⚠ {}", msg);
    }
}

/// Print a hint message (cyan).
///
/// Example: `→ check GITHUB_TOKEN`
pub fn hint(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        println!("→ {}", msg);
    }
}

/// Print a bold header.
///
/// Example: `octo/hello`
pub fn header(title: impl Display) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Print one performed or intended action.
///
/// Example: `  + created DATABASE_URL`
pub fn action(action: &Action) {
    let marker = match action.kind {
        ActionKind::Created | ActionKind::WouldCreate => "+",
        ActionKind::Updated | ActionKind::WouldUpdate => "~",
        ActionKind::Deleted | ActionKind::WouldDelete => "-",
    };

    if !colors_enabled() {
        println!("  {} {} {}", marker, action.kind, action.name);
        return;
    }

    let marker = match action.kind {
        ActionKind::Deleted => style(marker).red(),
        k if k.is_dry_run() => style(marker).yellow(),
        _ => style(marker).green(),
    };
    println!("  {} {} {}", marker, action.kind, style(&action.name).cyan());
}

// ============================================================================
// mediaedit-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: payloads on stdout, rejections and errors on stderr
//
// Payloads are either JSON (for scripts) or `Label: value` lines. Rejections
// always use the wire form `<CODE>: <message>` so callers can match on the
// code regardless of output mode.

// ---- External crate imports ----
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use mediaedit_core::Rejection;
use serde::Serialize;

// ---- Standard library imports ----
use std::fmt::Display;
use std::time::Duration;

/// Print an info line with label and value, with the label colored.
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", style(label).cyan().bold(), value);
}

/// Print a status line for a checked item.
pub fn print_check(label: &str, ok: bool, detail: &str) {
    let symbol = if ok {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    println!("{} {}: {}", symbol, style(label).bold(), detail);
}

/// Print any serializable payload as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => print_error(&format!("failed to serialize output: {e}")),
    }
}

/// Print a rejection as `<CODE>: <message>` on stderr.
pub fn print_rejection(rejection: &Rejection) {
    eprintln!(
        "{}: {}",
        style(rejection.code()).for_stderr().red().bold(),
        rejection.message
    );
}

/// Print a CLI-level error on stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").for_stderr().red().bold(), message);
}

/// Creates a spinner on stderr, or a hidden bar when `visible` is false.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

//! The `doctor` command: reports whether the external tools are installed.

use crate::cli_error;
use crate::error::CliResult;
use crate::output::{print_check, print_json};

use mediaedit_core::check_dependency;
use serde_json::{Map, Value};
use std::process::ExitCode;

/// Tools the ffmpeg-backed framework needs at runtime.
pub const REQUIRED_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Execute the doctor command.
///
/// Fails with an error naming the missing tools if any are unavailable.
pub fn run_doctor(json: bool) -> CliResult<ExitCode> {
    let mut missing = Vec::new();
    let mut report = Map::new();

    for tool in REQUIRED_TOOLS {
        let result = check_dependency(tool);
        let ok = result.is_ok();
        if !json {
            match &result {
                Ok(()) => print_check(tool, true, "available"),
                Err(e) => print_check(tool, false, &e.to_string()),
            }
        }
        report.insert((*tool).to_string(), Value::Bool(ok));
        if !ok {
            missing.push(*tool);
        }
    }

    if json {
        print_json(&Value::Object(report));
    }

    if missing.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(cli_error!("missing required tool(s): {}", missing.join(", ")))
    }
}

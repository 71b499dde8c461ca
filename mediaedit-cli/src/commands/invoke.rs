//! The `invoke` command: raw dispatch through the host method table.

use super::{Session, report};
use crate::output::print_json;

use mediaedit_core::{ErrorKind, PendingOperation, Rejection};
use serde_json::Value;
use std::process::ExitCode;

/// Parses the positional arguments, which must be a JSON array.
pub fn parse_args(args_json: &str) -> Result<Vec<Value>, Rejection> {
    serde_json::from_str::<Vec<Value>>(args_json).map_err(|e| {
        Rejection::new(
            ErrorKind::InvalidInput,
            format!("arguments must be a JSON array: {e}"),
        )
    })
}

/// Execute the invoke command.
pub fn run_invoke(session: &Session, method: &str, args_json: &str) -> ExitCode {
    log::debug!("Invoking {method} with {args_json}");
    let pending = match parse_args(args_json) {
        Ok(args) => session.bridge().invoke(method, &args),
        Err(rejection) => PendingOperation::settled(Err(rejection)),
    };

    let outcome = session.wait(method, pending);
    // The payload of a raw invocation is always shown as JSON.
    report(session.json(), outcome, print_json::<Value>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_args_accepts_array() {
        let args = parse_args(r#"["/v.mp4", "/a.m4a"]"#).unwrap();
        assert_eq!(args, vec![json!("/v.mp4"), json!("/a.m4a")]);
        assert!(parse_args("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_args_rejects_non_arrays() {
        let rejection = parse_args(r#"{"videoPath": "/v.mp4"}"#).unwrap_err();
        assert_eq!(rejection.kind, ErrorKind::InvalidInput);
        assert!(parse_args("not json").is_err());
    }
}

// mediaedit-cli/src/lib.rs
//
// Library portion of the mediaedit CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use commands::doctor::run_doctor;
pub use commands::invoke::run_invoke;
pub use commands::operations::{run_convert, run_merge, run_separate};
pub use commands::{Session, bridge_config};
pub use error::{CliErrorContext, CliResult};

//! User interface module.
//!
//! The release run is a non-interactive build step, so the whole UI is
//! output: progress lines, notices and the final summary, all in
//! `formatter`.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_command, display_command_output, display_error, display_heading,
    display_manual_push_instruction, display_notice, display_outcome, display_status,
    display_success, display_targets,
};

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod notice;
pub mod ui;
pub mod version;

pub use error::{ReleaseBranchError, Result};

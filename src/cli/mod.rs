//! Command-line interface for perch.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`provision`] - The provisioning command

pub mod args;
pub mod provision;

pub use args::Cli;
pub use provision::ProvisionCommand;

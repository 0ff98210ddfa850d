//! perch - Provision the Ghidra reverse-engineering toolkit.
//!
//! perch installs a pinned Ghidra release on a Linux host: it finds the
//! system package manager, installs the prerequisites, checks the Java
//! runtime, unpacks the release under an install root and links the
//! headless launcher onto PATH. The extended variant also installs the
//! ThingFinder plugin from git with pip.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - YAML overrides and built-in defaults
//! - [`context`] - Host snapshot threaded through every step
//! - [`detection`] - Package manager detection
//! - [`error`] - Error types and result aliases
//! - [`pipeline`] - Stage ordering and run orchestration
//! - [`runtime`] - Java version parsing
//! - [`shell`] - Command execution and host facts
//! - [`steps`] - The individual provisioning steps
//! - [`ui`] - Spinners, progress bars and terminal output
//!
//! # Example
//!
//! ```
//! use perch::config::{ProvisionConfig, Variant};
//! use perch::context::ExecutionContext;
//! use perch::pipeline::{Provisioner, RunOptions};
//! use perch::shell::MockRunner;
//! use perch::ui::MockUI;
//!
//! let ctx = ExecutionContext::new(ProvisionConfig::default(), Variant::Basic, 1000, Vec::new());
//! let runner = MockRunner::new();
//! let mut ui = MockUI::new();
//!
//! // A dry run prints the plan and needs no privileges.
//! let result = Provisioner::new(&ctx, &runner)
//!     .run(&RunOptions { dry_run: true }, &mut ui)
//!     .unwrap();
//! assert!(result.dry_run);
//! assert!(runner.commands().is_empty());
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod runtime;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{ProvisionError, Result};

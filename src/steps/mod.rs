//! Provisioning steps.
//!
//! Each step takes the [`ExecutionContext`](crate::context::ExecutionContext),
//! a [`CommandRunner`](crate::shell::CommandRunner) for anything that spawns
//! a process, and the UI. Steps return the first error they hit; the
//! [`Provisioner`](crate::pipeline::Provisioner) decides what runs next.

pub mod artifact;
pub mod dependencies;
pub mod java;
pub mod links;
pub mod secondary;

pub use artifact::{
    extract_archive, fetch_artifact, install_tree, locate_release_root, normalize_tree,
    ArtifactFetcher, EXTRACT_DIR_NAME,
};
pub use dependencies::{install_commands, install_dependencies};
pub use java::{check_minimum, verify_java};
pub use links::{create_links, replace_link, LinkReport, LinkWarning};
pub use secondary::{install_secondary, pip_commands};

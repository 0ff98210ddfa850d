//! Execution context threaded through every provisioning step.
//!
//! The context is a snapshot taken once at startup: effective uid, the
//! executable search path, the selected variant and the loaded config.
//! Steps read host facts from here instead of the process environment so
//! they can be tested against temporary directories.

use std::path::PathBuf;

use crate::config::{ProvisionConfig, Variant};
use crate::error::{ProvisionError, Result};
use crate::shell::{effective_uid, parse_system_path, resolve_tool_path};

/// Snapshot of the host plus configuration for one run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Effective user id at startup.
    pub uid: u32,

    /// PATH entries at startup.
    pub search_path: Vec<PathBuf>,

    /// Which flavour of the run to perform.
    pub variant: Variant,

    /// Resolved configuration.
    pub config: ProvisionConfig,
}

impl ExecutionContext {
    /// Capture the current process state.
    pub fn capture(config: ProvisionConfig, variant: Variant) -> Self {
        Self {
            uid: effective_uid(),
            search_path: parse_system_path(),
            variant,
            config,
        }
    }

    /// Build a context from explicit values.
    pub fn new(
        config: ProvisionConfig,
        variant: Variant,
        uid: u32,
        search_path: Vec<PathBuf>,
    ) -> Self {
        Self {
            uid,
            search_path,
            variant,
            config,
        }
    }

    /// Whether the run has root privileges.
    pub fn is_elevated(&self) -> bool {
        self.uid == 0
    }

    /// Fail with [`ProvisionError::InsufficientPrivilege`] unless root.
    pub fn require_elevated(&self) -> Result<()> {
        if self.is_elevated() {
            Ok(())
        } else {
            Err(ProvisionError::InsufficientPrivilege { uid: self.uid })
        }
    }

    /// Resolve `tool` against the captured search path.
    pub fn resolve(&self, tool: &str) -> Option<PathBuf> {
        resolve_tool_path(tool, &self.search_path)
    }
}

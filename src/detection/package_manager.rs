//! Package manager detection.

use std::fmt;
use std::path::PathBuf;

use crate::context::ExecutionContext;
use crate::error::{ProvisionError, Result};

/// Supported system package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    AptGet,
    Dnf,
    Yum,
}

impl PackageManager {
    /// Detection order: the first executable found wins.
    pub const PRIORITY: [PackageManager; 3] =
        [PackageManager::AptGet, PackageManager::Dnf, PackageManager::Yum];

    /// Executable name.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::AptGet => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// A detected package manager and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedManager {
    pub manager: PackageManager,
    pub path: PathBuf,
}

/// Detects the system package manager.
pub struct PackageManagerDetector;

impl PackageManagerDetector {
    /// Return the highest-priority package manager on the context's PATH.
    pub fn detect(ctx: &ExecutionContext) -> Result<DetectedManager> {
        for manager in PackageManager::PRIORITY {
            if let Some(path) = ctx.resolve(manager.command()) {
                tracing::debug!("Found {} at {}", manager, path.display());
                return Ok(DetectedManager { manager, path });
            }
        }

        Err(ProvisionError::UnsupportedEnvironment {
            searched: PackageManager::PRIORITY
                .iter()
                .map(|m| m.command())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

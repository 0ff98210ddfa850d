//! Error types for provisioning runs.
//!
//! This module defines [`ProvisionError`], the error type returned by every
//! provisioning step, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant except those wrapped by [`LinkWarning`](crate::steps::LinkWarning)
//!   is fatal: the pipeline stops at the first one it sees
//! - Use `anyhow::Error` (via `ProvisionError::Other`) for unexpected errors
//! - Messages name the failing command or path so the user can act on them

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The process is not running with root privileges.
    #[error("This installer must be run as root (effective uid {uid})")]
    InsufficientPrivilege { uid: u32 },

    /// None of the known package managers were found on PATH.
    #[error("No supported package manager found (looked for: {searched})")]
    UnsupportedEnvironment { searched: String },

    /// A package manager command exited unsuccessfully.
    #[error("Dependency installation failed with exit code {code:?}: {command}")]
    DependencyInstallFailure { command: String, code: Option<i32> },

    /// No `java` executable could be resolved.
    #[error("Java runtime not found on PATH (Java {required} or newer is required)")]
    MissingRuntime { required: u32 },

    /// The installed Java runtime is older than required.
    #[error("Java {found} found, but Java {required} or newer is required")]
    VersionTooLow { found: u32, required: u32 },

    /// The `java -version` report could not be understood.
    #[error("Could not parse Java version from: {report}")]
    MalformedVersion { report: String },

    /// The release archive could not be downloaded.
    #[error("Failed to download {url}: {message}")]
    DownloadFailure { url: String, message: String },

    /// The release archive could not be extracted or moved into place.
    #[error("Failed to extract {archive}: {message}")]
    ExtractionFailure { archive: PathBuf, message: String },

    /// Cloning or installing the secondary package failed.
    #[error("Secondary package install failed: {message}")]
    SecondaryInstallFailure { message: String },

    /// A forced entry-point link could not be created.
    #[error("Failed to link {link} -> {target}: {message}")]
    LinkFailure {
        link: PathBuf,
        target: PathBuf,
        message: String,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_privilege_displays_uid() {
        let err = ProvisionError::InsufficientPrivilege { uid: 1000 };
        let msg = err.to_string();
        assert!(msg.contains("root"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn unsupported_environment_lists_managers() {
        let err = ProvisionError::UnsupportedEnvironment {
            searched: "apt-get, dnf, yum".into(),
        };
        assert!(err.to_string().contains("apt-get, dnf, yum"));
    }

    #[test]
    fn dependency_install_failure_displays_command_and_code() {
        let err = ProvisionError::DependencyInstallFailure {
            command: "apt-get install -y unzip".into(),
            code: Some(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get install -y unzip"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn version_too_low_displays_both_versions() {
        let err = ProvisionError::VersionTooLow {
            found: 11,
            required: 17,
        };
        let msg = err.to_string();
        assert!(msg.contains("Java 11"));
        assert!(msg.contains("Java 17"));
    }

    #[test]
    fn missing_runtime_displays_requirement() {
        let err = ProvisionError::MissingRuntime { required: 17 };
        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn extraction_failure_displays_archive() {
        let err = ProvisionError::ExtractionFailure {
            archive: PathBuf::from("/tmp/ghidra.zip"),
            message: "unzip exited with code 9".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/ghidra.zip"));
        assert!(msg.contains("code 9"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ProvisionError = io_err.into();
        assert!(matches!(err, ProvisionError::Io(_)));
    }

    #[test]
    fn anyhow_error_is_transparent() {
        let err: ProvisionError = anyhow::anyhow!("something odd").into();
        assert_eq!(err.to_string(), "something odd");
    }
}

//! Host environment detection.

pub mod package_manager;

pub use package_manager::{DetectedManager, PackageManager, PackageManagerDetector};

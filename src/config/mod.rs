//! Configuration loading and parsing.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use perch::config::{parse_config, Variant};
//! use std::path::Path;
//!
//! let config = parse_config("install_root: /srv/ghidra", Path::new("config.yml")).unwrap();
//! assert_eq!(config.install_root, Path::new("/srv/ghidra"));
//! assert!(!Variant::Basic.installs_secondary());
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_file, parse_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    LinkConfig, PackageSets, ProvisionConfig, ReleaseDescriptor, SecondaryPackage, Variant,
};

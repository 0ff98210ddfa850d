//! Java runtime version handling.

pub mod version;

pub use version::JavaVersion;

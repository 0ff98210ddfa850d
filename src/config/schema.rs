//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the optional
//! YAML override file. Every field has a default, so an empty file (or no
//! file at all) describes the stock provisioning run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::detection::PackageManager;

/// Which of the two provisioning flavours to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Ghidra only, links are always (re)created.
    #[default]
    Basic,
    /// Ghidra plus ThingFinder, links are only created when missing.
    Extended,
}

impl Variant {
    /// Whether this variant installs the secondary package.
    pub fn installs_secondary(&self) -> bool {
        matches!(self, Variant::Extended)
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Extended => "extended",
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Release archive to install.
    pub release: ReleaseDescriptor,

    /// Directory the release tree is unpacked into.
    pub install_root: PathBuf,

    /// Scratch directory for the archive and its extraction.
    pub work_dir: PathBuf,

    /// Minimum accepted Java major version.
    pub min_java_major: u32,

    /// Packages per package manager.
    pub packages: PackageSets,

    /// ThingFinder checkout (extended variant).
    pub secondary: SecondaryPackage,

    /// Command-line entry points.
    pub links: LinkConfig,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            release: ReleaseDescriptor::default(),
            install_root: PathBuf::from("/opt/ghidra"),
            work_dir: std::env::temp_dir(),
            min_java_major: 17,
            packages: PackageSets::default(),
            secondary: SecondaryPackage::default(),
            links: LinkConfig::default(),
        }
    }
}

impl ProvisionConfig {
    /// Absolute path of the launcher the entry-point links point at.
    pub fn launcher_path(&self) -> PathBuf {
        self.install_root.join(&self.links.launcher)
    }
}

/// Fixed-version release descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDescriptor {
    /// Release version, e.g. `11.1.2`.
    pub version: String,

    /// Build date stamp, e.g. `20240709`.
    pub build_date: String,

    /// Explicit download URL; derived from version and build date if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Expected SHA-256 of the archive (hex). Unset skips verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Default for ReleaseDescriptor {
    fn default() -> Self {
        Self {
            version: "11.1.2".to_string(),
            build_date: "20240709".to_string(),
            url: None,
            sha256: None,
        }
    }
}

impl ReleaseDescriptor {
    /// The URL the archive is fetched from.
    pub fn download_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "https://github.com/NationalSecurityAgency/ghidra/releases/download/Ghidra_{v}_build/{name}",
                v = self.version,
                name = self.default_archive_name()
            ),
        }
    }

    /// File name the archive is saved under.
    pub fn archive_name(&self) -> String {
        let url = self.download_url();
        url.rsplit('/')
            .next()
            .map(|s| s.split(['?', '#']).next().unwrap_or(s))
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| self.default_archive_name())
    }

    fn default_archive_name(&self) -> String {
        format!("ghidra_{}_PUBLIC_{}.zip", self.version, self.build_date)
    }
}

/// Package lists per package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSets {
    /// Packages installed with apt-get.
    pub apt_get: Vec<String>,

    /// Packages installed with dnf.
    pub dnf: Vec<String>,

    /// Packages installed with yum.
    pub yum: Vec<String>,

    /// Appended for the extended variant, whatever the manager.
    pub extended: Vec<String>,
}

impl Default for PackageSets {
    fn default() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            apt_get: list(&["unzip", "wget", "openjdk-17-jdk"]),
            dnf: list(&["unzip", "wget", "java-17-openjdk"]),
            yum: list(&["unzip", "wget", "java-17-openjdk"]),
            extended: list(&["git", "python3-pip"]),
        }
    }
}

impl PackageSets {
    /// Ordered package list for a manager and variant.
    pub fn for_manager(&self, manager: PackageManager, variant: Variant) -> Vec<String> {
        let mut packages = match manager {
            PackageManager::AptGet => self.apt_get.clone(),
            PackageManager::Dnf => self.dnf.clone(),
            PackageManager::Yum => self.yum.clone(),
        };
        if variant.installs_secondary() {
            for pkg in &self.extended {
                if !packages.contains(pkg) {
                    packages.push(pkg.clone());
                }
            }
        }
        packages
    }
}

/// Secondary Python package cloned from git.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryPackage {
    /// Git remote to clone.
    pub repository: String,

    /// Directory the repository is cloned into.
    pub clone_dir: PathBuf,

    /// Upgrade pip and install `requirements.txt` before the package itself.
    pub install_dependencies: bool,

    /// Python interpreter used to drive pip.
    pub python: String,
}

impl Default for SecondaryPackage {
    fn default() -> Self {
        Self {
            repository: "https://github.com/thingfinder/thingfinder.git".to_string(),
            clone_dir: PathBuf::from("/opt/thingfinder"),
            install_dependencies: false,
            python: "python3".to_string(),
        }
    }
}

/// Entry-point link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Launcher path relative to the install root.
    pub launcher: PathBuf,

    /// Command names linked to the launcher.
    pub commands: Vec<String>,

    /// Directory on PATH the links are placed in.
    pub link_dir: PathBuf,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            launcher: PathBuf::from("support/analyzeHeadless"),
            commands: vec!["analyzeHeadless".to_string(), "ghidra-headless".to_string()],
            link_dir: PathBuf::from("/usr/local/bin"),
        }
    }
}

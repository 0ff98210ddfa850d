//! Java version parsing.
//!
//! `java -version` prints something like:
//!
//! ```text
//! openjdk version "17.0.10" 2024-01-16
//! OpenJDK Runtime Environment (build 17.0.10+7-Ubuntu-122.04.1)
//! ```
//!
//! The version is the text between the first pair of double quotes. Its
//! components are dot-separated; each is read up to the first non-digit so
//! `"21-ea"` and `"1.8.0_392"` both parse. Legacy `1.x` versions are taken
//! literally, giving a major of `1`.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ProvisionError;

/// A parsed Java version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JavaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl JavaVersion {
    /// Create a version from its parts.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the full `java -version` report.
    pub fn from_report(report: &str) -> Result<Self, ProvisionError> {
        let quoted = quoted_version(report).ok_or_else(|| malformed(report))?;
        quoted.parse().map_err(|_: ProvisionError| malformed(report))
    }
}

impl FromStr for JavaVersion {
    type Err = ProvisionError;

    /// Parse a bare version string such as `17.0.10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(leading_number)
            .ok_or_else(|| malformed(s))?;
        let minor = parts.next().and_then(leading_number).unwrap_or(0);
        let patch = parts.next().and_then(leading_number).unwrap_or(0);
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// First double-quoted span of a `java -version` report.
static QUOTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("QUOTED_REGEX must compile"));

fn quoted_version(report: &str) -> Option<&str> {
    QUOTED_REGEX
        .captures(report)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn leading_number(token: &str) -> Option<u32> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn malformed(report: &str) -> ProvisionError {
    ProvisionError::MalformedVersion {
        report: report.lines().next().unwrap_or("").trim().to_string(),
    }
}

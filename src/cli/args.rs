//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Variant;
use crate::ui::OutputMode;

/// perch - Provision the Ghidra reverse-engineering toolkit.
#[derive(Debug, Parser)]
#[command(name = "perch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Which install to perform
    #[arg(long, value_enum, default_value_t = Variant::Basic)]
    pub variant: Variant,

    /// Path to a YAML config file (default /etc/perch/config.yml if present)
    #[arg(short, long, env = "PERCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the resolved plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Show output of package manager and other child commands
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode selected by `--verbose` / `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_basic_normal() {
        let cli = Cli::parse_from(["perch"]);
        assert_eq!(cli.variant, Variant::Basic);
        assert_eq!(cli.output_mode(), OutputMode::Normal);
        assert!(!cli.dry_run);
    }

    #[test]
    fn parses_variant_and_flags() {
        let cli = Cli::parse_from([
            "perch",
            "--variant",
            "extended",
            "-c",
            "/tmp/perch.yml",
            "--dry-run",
            "-q",
        ]);
        assert_eq!(cli.variant, Variant::Extended);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/perch.yml")));
        assert!(cli.dry_run);
        assert_eq!(cli.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["perch", "--variant", "full"]).is_err());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["perch", "-v", "-q"]).is_err());
    }
}

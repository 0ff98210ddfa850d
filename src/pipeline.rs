//! Provisioning run orchestration.
//!
//! A run is a fixed, forward-only sequence of [`Stage`]s preceded by a
//! privilege check. The first failing stage ends the run; nothing already
//! done is rolled back.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::Variant;
use crate::context::ExecutionContext;
use crate::detection::{DetectedManager, PackageManagerDetector};
use crate::error::Result;
use crate::runtime::JavaVersion;
use crate::shell::CommandRunner;
use crate::steps::{
    create_links, fetch_artifact, install_dependencies, install_secondary, verify_java,
    ArtifactFetcher, LinkReport,
};
use crate::ui::{format_duration, UserInterface};

/// One step of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detect,
    InstallDeps,
    VerifyRuntime,
    FetchArtifact,
    InstallSecondary,
    Link,
}

impl Stage {
    /// Stages run for `variant`, in order.
    pub fn plan(variant: Variant) -> Vec<Stage> {
        let mut stages = vec![
            Stage::Detect,
            Stage::InstallDeps,
            Stage::VerifyRuntime,
            Stage::FetchArtifact,
        ];
        if variant.installs_secondary() {
            stages.push(Stage::InstallSecondary);
        }
        stages.push(Stage::Link);
        stages
    }

    /// Human-readable title for step lines.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Detect => "Detecting package manager",
            Stage::InstallDeps => "Installing dependencies",
            Stage::VerifyRuntime => "Verifying Java runtime",
            Stage::FetchArtifact => "Fetching Ghidra release",
            Stage::InstallSecondary => "Installing ThingFinder",
            Stage::Link => "Linking commands",
        }
    }
}

/// Options for a run.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Print the plan instead of running it.
    pub dry_run: bool,
}

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct ProvisionResult {
    /// Stages that completed, in order.
    pub completed: Vec<Stage>,

    /// Package manager that was used.
    pub manager: Option<DetectedManager>,

    /// Java version that passed the check.
    pub java: Option<JavaVersion>,

    /// Where the release was installed.
    pub install_root: Option<PathBuf>,

    /// Entry-point link outcome.
    pub links: LinkReport,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Wall-clock time of the run.
    pub duration: Duration,
}

/// Runs the provisioning stages against a context.
pub struct Provisioner<'a> {
    ctx: &'a ExecutionContext,
    runner: &'a dyn CommandRunner,
}

impl<'a> Provisioner<'a> {
    /// Create a provisioner.
    pub fn new(ctx: &'a ExecutionContext, runner: &'a dyn CommandRunner) -> Self {
        Self { ctx, runner }
    }

    /// Run every stage for the context's variant.
    pub fn run(&self, options: &RunOptions, ui: &mut dyn UserInterface) -> Result<ProvisionResult> {
        let start = Instant::now();
        let variant = self.ctx.variant;
        ui.show_header(&format!(
            "Ghidra {} ({} install)",
            self.ctx.config.release.version,
            variant.name()
        ));

        if options.dry_run {
            self.show_plan(ui);
            return Ok(ProvisionResult {
                dry_run: true,
                duration: start.elapsed(),
                ..Default::default()
            });
        }

        self.ctx.require_elevated()?;

        let stages = Stage::plan(variant);
        let total = stages.len();
        let mut result = ProvisionResult::default();

        for (index, stage) in stages.into_iter().enumerate() {
            ui.show_step(index + 1, total, stage.title());
            tracing::info!("Stage {:?} starting", stage);
            let stage_start = Instant::now();

            self.run_stage(stage, &mut result, ui).inspect_err(|e| {
                tracing::error!("Stage {:?} failed: {}", stage, e);
            })?;

            tracing::debug!(
                "Stage {:?} finished in {}",
                stage,
                format_duration(stage_start.elapsed())
            );
            result.completed.push(stage);
        }

        result.duration = start.elapsed();
        ui.success(&format!(
            "Provisioning complete in {}",
            format_duration(result.duration)
        ));
        Ok(result)
    }

    fn run_stage(
        &self,
        stage: Stage,
        result: &mut ProvisionResult,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        match stage {
            Stage::Detect => {
                let detected = PackageManagerDetector::detect(self.ctx)?;
                ui.success(&format!(
                    "Using {} ({})",
                    detected.manager,
                    detected.path.display()
                ));
                result.manager = Some(detected);
            }
            Stage::InstallDeps => {
                if let Some(detected) = &result.manager {
                    install_dependencies(self.ctx, detected, self.runner, ui)?;
                }
            }
            Stage::VerifyRuntime => {
                result.java = Some(verify_java(self.ctx, self.runner, ui)?);
            }
            Stage::FetchArtifact => {
                let fetcher = ArtifactFetcher::new()?;
                result.install_root = Some(fetch_artifact(self.ctx, &fetcher, self.runner, ui)?);
            }
            Stage::InstallSecondary => install_secondary(self.ctx, self.runner, ui)?,
            Stage::Link => result.links = create_links(self.ctx, ui)?,
        }
        Ok(())
    }

    fn show_plan(&self, ui: &mut dyn UserInterface) {
        let config = &self.ctx.config;
        ui.message("Dry run: nothing will be changed.");
        ui.show_detail("Variant", self.ctx.variant.name());
        ui.show_detail("Release URL", &config.release.download_url());
        if let Some(sha) = &config.release.sha256 {
            ui.show_detail("SHA-256", sha);
        }
        ui.show_detail("Install root", &config.install_root.display().to_string());
        ui.show_detail("Work dir", &config.work_dir.display().to_string());
        ui.show_detail("Minimum Java", &config.min_java_major.to_string());
        if self.ctx.variant.installs_secondary() {
            ui.show_detail("ThingFinder", &config.secondary.repository);
            ui.show_detail(
                "Clone dir",
                &config.secondary.clone_dir.display().to_string(),
            );
        }
        ui.show_detail(
            "Launcher",
            &config.launcher_path().display().to_string(),
        );
        for command in &config.links.commands {
            ui.show_detail(
                "Link",
                &config.links.link_dir.join(command).display().to_string(),
            );
        }

        let stages = Stage::plan(self.ctx.variant);
        let total = stages.len();
        for (index, stage) in stages.iter().enumerate() {
            ui.show_step(index + 1, total, stage.title());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvisionConfig;
    use crate::error::ProvisionError;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;

    #[test]
    fn basic_plan_skips_secondary() {
        assert_eq!(
            Stage::plan(Variant::Basic),
            vec![
                Stage::Detect,
                Stage::InstallDeps,
                Stage::VerifyRuntime,
                Stage::FetchArtifact,
                Stage::Link
            ]
        );
    }

    #[test]
    fn extended_plan_installs_secondary_before_linking() {
        let plan = Stage::plan(Variant::Extended);
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[4], Stage::InstallSecondary);
        assert_eq!(plan[5], Stage::Link);
    }

    #[test]
    fn non_root_fails_before_any_command() {
        let ctx = ExecutionContext::new(ProvisionConfig::default(), Variant::Basic, 1000, Vec::new());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let err = Provisioner::new(&ctx, &runner)
            .run(&RunOptions::default(), &mut ui)
            .unwrap_err();

        assert!(matches!(err, ProvisionError::InsufficientPrivilege { uid: 1000 }));
        assert!(runner.commands().is_empty());
        assert!(ui.steps().is_empty());
    }

    #[test]
    fn dry_run_needs_no_root_and_runs_nothing() {
        let ctx = ExecutionContext::new(
            ProvisionConfig::default(),
            Variant::Extended,
            1000,
            Vec::new(),
        );
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let result = Provisioner::new(&ctx, &runner)
            .run(&RunOptions { dry_run: true }, &mut ui)
            .unwrap();

        assert!(result.dry_run);
        assert!(result.completed.is_empty());
        assert!(runner.commands().is_empty());
        assert_eq!(ui.steps().len(), 6);
        assert!(ui
            .details()
            .iter()
            .any(|(k, v)| k == "Install root" && v == "/opt/ghidra"));
    }

    #[test]
    fn no_package_manager_is_unsupported() {
        let ctx = ExecutionContext::new(ProvisionConfig::default(), Variant::Basic, 0, Vec::new());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let err = Provisioner::new(&ctx, &runner)
            .run(&RunOptions::default(), &mut ui)
            .unwrap_err();

        assert!(matches!(err, ProvisionError::UnsupportedEnvironment { .. }));
        assert_eq!(ui.steps().len(), 1);
    }

    #[cfg(unix)]
    mod scenarios {
        use super::*;
        use crate::shell::{CommandResult, CommandSpec};
        use httpmock::prelude::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;
        use tempfile::TempDir;

        fn fake_tool(dir: &Path, name: &str) -> PathBuf {
            fs::create_dir_all(dir).unwrap();
            let path = dir.join(name);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn fake_unzip(spec: &CommandSpec) -> CommandResult {
            let dest = spec
                .args
                .iter()
                .position(|a| a == "-d")
                .map(|i| PathBuf::from(&spec.args[i + 1]))
                .unwrap();
            fake_tool(&dest.join("ghidra_11.1.2_PUBLIC/support"), "analyzeHeadless");
            CommandResult::success(String::new(), String::new(), Duration::ZERO)
        }

        #[test]
        fn apt_get_without_java_stops_at_runtime_check() {
            let temp = TempDir::new().unwrap();
            let bin = temp.path().join("bin");
            fake_tool(&bin, "apt-get");
            let config = ProvisionConfig {
                install_root: temp.path().join("ghidra"),
                ..Default::default()
            };
            let ctx = ExecutionContext::new(config, Variant::Basic, 0, vec![bin]);
            let runner = MockRunner::new();
            let mut ui = MockUI::new();

            let err = Provisioner::new(&ctx, &runner)
                .run(&RunOptions::default(), &mut ui)
                .unwrap_err();

            assert!(matches!(err, ProvisionError::MissingRuntime { required: 17 }));
            assert!(runner.ran("apt-get install -y unzip wget openjdk-17-jdk"));
            assert_eq!(ui.steps().len(), 3);
            assert!(!temp.path().join("ghidra").exists());
        }

        #[test]
        fn extended_run_completes_every_stage() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/ghidra.zip");
                then.status(200).body("zip");
            });

            let temp = TempDir::new().unwrap();
            let bin = temp.path().join("bin");
            fake_tool(&bin, "dnf");
            let java = fake_tool(&bin, "java");
            let link_dir = temp.path().join("local/bin");

            let mut config = ProvisionConfig {
                install_root: temp.path().join("opt/ghidra"),
                work_dir: temp.path().join("work"),
                ..Default::default()
            };
            config.release.url = Some(server.url("/ghidra.zip"));
            config.secondary.clone_dir = temp.path().join("opt/thingfinder");
            config.links.link_dir = link_dir.clone();
            let ctx = ExecutionContext::new(config, Variant::Extended, 0, vec![bin, link_dir.clone()]);

            let runner = MockRunner::new();
            runner.succeed_with_stderr(
                &java.display().to_string(),
                "openjdk version \"21.0.2\" 2024-01-16\n",
            );
            runner.respond("unzip", fake_unzip);
            let mut ui = MockUI::new();

            let result = Provisioner::new(&ctx, &runner)
                .run(&RunOptions::default(), &mut ui)
                .unwrap();

            assert_eq!(result.completed, Stage::plan(Variant::Extended));
            assert_eq!(result.java, Some(JavaVersion::new(21, 0, 2)));
            assert_eq!(result.install_root, Some(temp.path().join("opt/ghidra")));
            assert_eq!(result.links.linked.len(), 2);
            assert!(result.links.warnings.is_empty());
            assert!(runner.ran("dnf install -y unzip wget java-17-openjdk git python3-pip"));
            assert!(runner.ran("git clone"));
            assert!(link_dir.join("ghidra-headless").exists());
            assert!(ui.has_success("Provisioning complete"));
        }
    }
}

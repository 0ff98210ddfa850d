//! The provisioning command.

use crate::cli::args::Cli;
use crate::config::{load_config, Variant};
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::pipeline::{ProvisionResult, Provisioner, RunOptions};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

/// Loads configuration, captures the host and runs the pipeline.
pub struct ProvisionCommand {
    variant: Variant,
    config: Option<std::path::PathBuf>,
    dry_run: bool,
}

impl ProvisionCommand {
    /// Build the command from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            variant: cli.variant,
            config: cli.config.clone(),
            dry_run: cli.dry_run,
        }
    }

    /// Execute against the real host.
    pub fn execute(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let ctx = ExecutionContext::capture(config, self.variant);
        tracing::debug!(
            "uid {} with {} PATH entries",
            ctx.uid,
            ctx.search_path.len()
        );
        let runner = SystemRunner::new(ui.output_mode().shows_command_output());
        self.execute_with(&ctx, &runner, ui)
    }

    /// Execute against an explicit context and runner.
    pub fn execute_with(
        &self,
        ctx: &ExecutionContext,
        runner: &dyn CommandRunner,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let options = RunOptions {
            dry_run: self.dry_run,
        };
        let result = Provisioner::new(ctx, runner).run(&options, ui)?;
        if !result.dry_run {
            show_summary(ctx, &result, ui);
        }
        Ok(())
    }
}

fn show_summary(ctx: &ExecutionContext, result: &ProvisionResult, ui: &mut dyn UserInterface) {
    if let Some(root) = &result.install_root {
        ui.show_detail("Installed", &root.display().to_string());
    }
    if let Some(java) = &result.java {
        ui.show_detail("Java", &java.to_string());
    }
    if ctx.variant.installs_secondary() {
        ui.show_detail(
            "ThingFinder",
            &ctx.config.secondary.clone_dir.display().to_string(),
        );
    }
    for link in &result.links.linked {
        ui.show_detail("Command", &link.display().to_string());
    }
    if !result.links.warnings.is_empty() {
        ui.warning(&format!(
            "{} command(s) are not reachable through PATH",
            result.links.warnings.len()
        ));
    }
}

//! OS package installation.

use crate::context::ExecutionContext;
use crate::detection::{DetectedManager, PackageManager};
use crate::error::{ProvisionError, Result};
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// The update-and-install command sequence for a package manager.
pub fn install_commands(manager: PackageManager, packages: &[String]) -> Vec<CommandSpec> {
    let program = manager.command();
    match manager {
        PackageManager::AptGet => vec![
            CommandSpec::new(program)
                .arg("update")
                .env("DEBIAN_FRONTEND", "noninteractive"),
            CommandSpec::new(program)
                .args(["install", "-y"])
                .args(packages.iter().cloned())
                .env("DEBIAN_FRONTEND", "noninteractive"),
        ],
        PackageManager::Dnf | PackageManager::Yum => vec![
            CommandSpec::new(program).arg("makecache"),
            CommandSpec::new(program)
                .args(["install", "-y"])
                .args(packages.iter().cloned()),
        ],
    }
}

/// Install the configured packages with the detected manager.
///
/// Commands run in order and the first failure stops the step.
pub fn install_dependencies(
    ctx: &ExecutionContext,
    detected: &DetectedManager,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let packages = ctx
        .config
        .packages
        .for_manager(detected.manager, ctx.variant);
    tracing::info!(
        "Installing {} with {}",
        packages.join(" "),
        detected.manager
    );

    for spec in install_commands(detected.manager, &packages) {
        let mut spinner = ui.start_spinner(&spec.to_string());
        let result = runner.run(&spec).map_err(|e| {
            spinner.finish_error(&format!("{} could not be started", spec.program));
            ProvisionError::DependencyInstallFailure {
                command: format!("{} ({})", spec, e),
                code: None,
            }
        })?;

        if !result.success {
            spinner.finish_error(&spec.to_string());
            if let Some(line) = result.last_output_line() {
                ui.show_hint(line);
            }
            return Err(ProvisionError::DependencyInstallFailure {
                command: spec.to_string(),
                code: result.exit_code,
            });
        }
        spinner.finish_success(&spec.to_string());
    }

    Ok(())
}

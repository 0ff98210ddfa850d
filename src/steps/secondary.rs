//! ThingFinder checkout and pip install (extended variant).

use std::fs;
use std::path::Path;

use crate::config::SecondaryPackage;
use crate::context::ExecutionContext;
use crate::error::{ProvisionError, Result};
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// Commands run after the clone, in order.
pub fn pip_commands(package: &SecondaryPackage) -> Vec<CommandSpec> {
    let pip = || CommandSpec::new(package.python.as_str()).args(["-m", "pip", "install"]);
    let mut commands = Vec::new();

    if package.install_dependencies {
        commands.push(pip().args(["--upgrade", "pip"]));
        let requirements = package.clone_dir.join("requirements.txt");
        if requirements.is_file() {
            commands.push(pip().arg("-r").path_arg(&requirements));
        }
    }
    commands.push(pip().path_arg(&package.clone_dir));
    commands
}

fn is_populated(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Clone the secondary repository and install it with pip.
///
/// The clone directory must be absent or empty; a populated directory is
/// reported rather than reused.
pub fn install_secondary(
    ctx: &ExecutionContext,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let package = &ctx.config.secondary;
    let dir = &package.clone_dir;

    if is_populated(dir) {
        return Err(ProvisionError::SecondaryInstallFailure {
            message: format!("{} already exists and is not empty", dir.display()),
        });
    }

    let clone = CommandSpec::new("git")
        .arg("clone")
        .arg(package.repository.as_str())
        .path_arg(dir);
    run_step(runner, ui, clone, "Cloned ThingFinder")?;

    // Read requirements.txt only after the clone has produced it.
    for spec in pip_commands(package) {
        run_step(runner, ui, spec, "Installed with pip")?;
    }

    ui.success(&format!("ThingFinder installed from {}", dir.display()));
    Ok(())
}

fn run_step(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    spec: CommandSpec,
    done: &str,
) -> Result<()> {
    let mut spinner = ui.start_spinner(&spec.to_string());
    let failure = |detail: String| ProvisionError::SecondaryInstallFailure {
        message: format!("{}: {}", spec, detail),
    };

    let result = match runner.run(&spec) {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_error(&spec.to_string());
            return Err(failure(e.to_string()));
        }
    };
    if !result.success {
        spinner.finish_error(&spec.to_string());
        let detail = result
            .last_output_line()
            .map(String::from)
            .unwrap_or_else(|| format!("exit code {:?}", result.exit_code));
        return Err(failure(detail));
    }

    spinner.finish_success(done);
    Ok(())
}

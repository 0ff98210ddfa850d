//! Command-line entry points for the headless launcher.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Variant;
use crate::context::ExecutionContext;
use crate::error::{ProvisionError, Result};
use crate::ui::UserInterface;

/// A link that was created but cannot be reached through PATH.
///
/// Non-fatal: the run still succeeds and the warning is shown with the
/// shell line that fixes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkWarning {
    /// Command name that does not resolve.
    pub command: String,

    /// Directory the link was (or should have been) placed in.
    pub link_dir: PathBuf,

    /// IO error that prevented the link, if any.
    pub cause: Option<String>,
}

impl LinkWarning {
    /// Shell line that puts `link_dir` on PATH.
    pub fn instruction(&self) -> String {
        format!("export PATH=\"{}:$PATH\"", self.link_dir.display())
    }
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(
                f,
                "Could not link {} in {} ({})",
                self.command,
                self.link_dir.display(),
                cause
            ),
            None => write!(
                f,
                "{} is not on PATH after linking into {}",
                self.command,
                self.link_dir.display()
            ),
        }
    }
}

/// What the linker did.
#[derive(Debug, Default)]
pub struct LinkReport {
    /// Links created, as full paths.
    pub linked: Vec<PathBuf>,

    /// Commands left alone because they already resolved.
    pub skipped: Vec<String>,

    /// Non-fatal problems.
    pub warnings: Vec<LinkWarning>,
}

/// Replace a file or symlink at `link` with a symlink to `target`.
///
/// A real directory at `link` is never removed; it is reported as an error.
pub fn replace_link(link: &Path, target: &Path) -> io::Result<()> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.is_dir() => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a directory", link.display()),
            ))
        }
        Ok(_) => fs::remove_file(link)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    symlink(target, link)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Create the configured entry points.
///
/// The basic variant always replaces links and treats IO errors as fatal.
/// The extended variant leaves commands that already resolve alone and
/// turns every problem into a [`LinkWarning`].
pub fn create_links(ctx: &ExecutionContext, ui: &mut dyn UserInterface) -> Result<LinkReport> {
    let links = &ctx.config.links;
    let launcher = ctx.config.launcher_path();
    let mut report = LinkReport::default();

    for command in &links.commands {
        let link = links.link_dir.join(command);

        match ctx.variant {
            Variant::Basic => {
                replace_link(&link, &launcher).map_err(|e| ProvisionError::LinkFailure {
                    link: link.clone(),
                    target: launcher.clone(),
                    message: e.to_string(),
                })?;
                tracing::debug!("Linked {} -> {}", link.display(), launcher.display());
                ui.success(&format!("Linked {}", link.display()));
                report.linked.push(link);
            }
            Variant::Extended => {
                if let Some(existing) = ctx.resolve(command) {
                    ui.message(&format!(
                        "{} already available at {}",
                        command,
                        existing.display()
                    ));
                    report.skipped.push(command.clone());
                    continue;
                }

                let warning = match replace_link(&link, &launcher) {
                    Ok(()) => {
                        ui.success(&format!("Linked {}", link.display()));
                        report.linked.push(link);
                        ctx.resolve(command).is_none().then(|| LinkWarning {
                            command: command.clone(),
                            link_dir: links.link_dir.clone(),
                            cause: None,
                        })
                    }
                    Err(e) => Some(LinkWarning {
                        command: command.clone(),
                        link_dir: links.link_dir.clone(),
                        cause: Some(e.to_string()),
                    }),
                };

                if let Some(warning) = warning {
                    tracing::warn!("{}", warning);
                    ui.warning(&warning.to_string());
                    ui.show_hint(&warning.instruction());
                    report.warnings.push(warning);
                }
            }
        }
    }

    Ok(report)
}

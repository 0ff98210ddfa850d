//! Release archive download, extraction and placement.
//!
//! The archive is streamed to the work directory, optionally checked
//! against a SHA-256 digest, unpacked with `unzip`, and its top-level
//! directory moved to the install root. Temporary files are removed only
//! after the tree is in place, so a failed run leaves them for inspection.

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::context::ExecutionContext;
use crate::error::{ProvisionError, Result};
use crate::shell::{effective_gid, effective_uid, CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// Name of the scratch directory the archive is unpacked into.
pub const EXTRACT_DIR_NAME: &str = "ghidra-extract";

const CHUNK_SIZE: usize = 64 * 1024;

/// Streams release archives over HTTP.
pub struct ArtifactFetcher {
    client: Client,
}

impl ArtifactFetcher {
    /// Create a fetcher with a 30-second connect timeout.
    pub fn new() -> Result<Self> {
        Self::with_connect_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom connect timeout.
    ///
    /// Only connection setup is bounded; a slow body stream is allowed to
    /// finish.
    pub fn with_connect_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("perch/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(None)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self { client })
    }

    /// Download `url` into `dest`, returning the number of bytes written.
    ///
    /// When `expected_sha256` is set the digest of the streamed body must
    /// match it (hex, case-insensitive).
    pub fn download(
        &self,
        url: &str,
        dest: &Path,
        expected_sha256: Option<&str>,
        ui: &mut dyn UserInterface,
    ) -> Result<u64> {
        let failure = |message: String| ProvisionError::DownloadFailure {
            url: url.to_string(),
            message,
        };

        tracing::info!("Downloading {}", url);
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| failure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(format!("HTTP {}", response.status())));
        }

        let mut file = create_destination(dest)
            .map_err(|e| failure(format!("could not create {}: {}", dest.display(), e)))?;
        let mut hasher = Sha256::new();
        let mut transfer = ui.start_transfer("Downloading release", response.content_length());
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;

        let streamed: std::result::Result<(), String> = loop {
            let n = match response.read(&mut buf) {
                Ok(0) => break file.flush().map_err(|e| e.to_string()),
                Ok(n) => n,
                Err(e) => break Err(e.to_string()),
            };
            if let Err(e) = file.write_all(&buf[..n]) {
                break Err(format!("could not write {}: {}", dest.display(), e));
            }
            hasher.update(&buf[..n]);
            written += n as u64;
            transfer.advance(n as u64);
        };
        transfer.finish();
        streamed.map_err(failure)?;

        if let Some(expected) = expected_sha256 {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(failure(format!(
                    "checksum mismatch (expected {}, got {})",
                    expected.trim(),
                    actual
                )));
            }
            tracing::debug!("Checksum verified: {}", actual);
        }

        tracing::debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

fn create_destination(dest: &Path) -> std::io::Result<File> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(dest)
}

/// Unpack `archive` into `dest` with `unzip`.
pub fn extract_archive(archive: &Path, dest: &Path, runner: &dyn CommandRunner) -> Result<()> {
    let failure = |message: String| ProvisionError::ExtractionFailure {
        archive: archive.to_path_buf(),
        message,
    };

    fs::create_dir_all(dest)?;
    let spec = CommandSpec::new("unzip")
        .args(["-q", "-o"])
        .path_arg(archive)
        .arg("-d")
        .path_arg(dest)
        .captured();

    let result = runner
        .run(&spec)
        .map_err(|e| failure(format!("could not run unzip: {}", e)))?;
    if !result.success {
        let detail = result
            .last_output_line()
            .map(String::from)
            .unwrap_or_else(|| format!("unzip exited with {:?}", result.exit_code));
        return Err(failure(detail));
    }
    Ok(())
}

/// Find the release tree inside an extraction directory.
///
/// A single top-level directory is the tree; anything else means the
/// extraction directory itself is.
pub fn locate_release_root(extract_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let entries: Vec<PathBuf> = fs::read_dir(extract_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;

    Ok(match entries.as_slice() {
        [] => None,
        [only] if only.is_dir() => Some(only.clone()),
        _ => Some(extract_dir.to_path_buf()),
    })
}

/// Replace `install_root` with `source`.
pub fn install_tree(source: &Path, install_root: &Path) -> std::io::Result<()> {
    if let Some(parent) = install_root.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::symlink_metadata(install_root).is_ok() {
        tracing::info!("Replacing existing {}", install_root.display());
        remove_path(install_root)?;
    }

    match fs::rename(source, install_root) {
        Ok(()) => Ok(()),
        Err(e) => {
            // Work dir and install root may be on different filesystems.
            tracing::debug!("rename failed ({}), copying instead", e);
            copy_tree(source, install_root)?;
            remove_path(source)
        }
    }
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn copy_tree(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else if file_type.is_symlink() {
            copy_symlink(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

/// Mode a tree entry is normalized to.
pub fn normalized_mode(is_dir: bool, mode: u32) -> u32 {
    if is_dir || mode & 0o111 != 0 {
        0o755
    } else {
        0o644
    }
}

/// Give every entry under `root` to `uid:gid` and normalize its mode.
///
/// The installer hands the tree to whoever runs it, which is root in a
/// real run.
///
/// Symlinks are re-owned but their targets' modes are left alone.
#[cfg(unix)]
pub fn normalize_tree(root: &Path, uid: u32, gid: u32) -> std::io::Result<()> {
    use std::os::unix::fs::{lchown, PermissionsExt};

    let meta = fs::symlink_metadata(root)?;
    lchown(root, Some(uid), Some(gid))?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }

    let mode = normalized_mode(meta.is_dir(), meta.permissions().mode());
    fs::set_permissions(root, fs::Permissions::from_mode(mode))?;

    if meta.is_dir() {
        for entry in fs::read_dir(root)? {
            normalize_tree(&entry?.path(), uid, gid)?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn normalize_tree(_root: &Path, _uid: u32, _gid: u32) -> std::io::Result<()> {
    Ok(())
}

/// Download, unpack and place the release, returning the install root.
pub fn fetch_artifact(
    ctx: &ExecutionContext,
    fetcher: &ArtifactFetcher,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<PathBuf> {
    let release = &ctx.config.release;
    let url = release.download_url();
    let work_dir = &ctx.config.work_dir;
    let archive = work_dir.join(release.archive_name());
    let extract_dir = work_dir.join(EXTRACT_DIR_NAME);
    let install_root = &ctx.config.install_root;

    let bytes = fetcher.download(&url, &archive, release.sha256.as_deref(), ui)?;
    ui.success(&format!(
        "Downloaded {} ({})",
        release.archive_name(),
        crate::ui::format_bytes(bytes)
    ));

    if extract_dir.exists() {
        fs::remove_dir_all(&extract_dir)?;
    }
    let mut spinner = ui.start_spinner("Extracting archive");
    if let Err(e) = extract_archive(&archive, &extract_dir, runner) {
        spinner.finish_error("Extraction failed");
        return Err(e);
    }

    let extraction_failure = |message: String| ProvisionError::ExtractionFailure {
        archive: archive.clone(),
        message,
    };
    let tree = locate_release_root(&extract_dir)
        .map_err(|e| extraction_failure(e.to_string()))?
        .ok_or_else(|| extraction_failure("archive contained no files".to_string()));
    let tree = match tree {
        Ok(tree) => tree,
        Err(e) => {
            spinner.finish_error("Extraction failed");
            return Err(e);
        }
    };

    let placed = install_tree(&tree, install_root)
        .map_err(|e| format!("could not move into {}: {}", install_root.display(), e))
        .and_then(|()| {
            normalize_tree(install_root, effective_uid(), effective_gid()).map_err(|e| {
                format!("could not set ownership under {}: {}", install_root.display(), e)
            })
        });
    if let Err(message) = placed {
        spinner.finish_error("Install failed");
        return Err(extraction_failure(message));
    }
    spinner.finish_success(&format!("Installed to {}", install_root.display()));

    fs::remove_file(&archive)?;
    if extract_dir.exists() {
        fs::remove_dir_all(&extract_dir)?;
    }
    tracing::debug!("Removed temporary files from {}", work_dir.display());

    Ok(install_root.clone())
}

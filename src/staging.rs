//! Staged output writes.
//!
//! Artifacts are written into a transaction directory first and only moved
//! into the output directory once every render succeeded. A failed publish
//! restores whatever it replaced.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Transaction directory living inside the destination root.
pub struct StagedOutputs {
    txn: TempDir,
    dest_root: PathBuf,
}

impl StagedOutputs {
    pub fn begin(dest_root: &Path) -> Result<Self> {
        fs::create_dir_all(dest_root)
            .with_context(|| format!("create {}", dest_root.display()))?;
        let txn = tempfile::Builder::new()
            .prefix(".schemadoc-txn-")
            .tempdir_in(dest_root)
            .with_context(|| format!("create staging dir in {}", dest_root.display()))?;
        Ok(Self {
            txn,
            dest_root: dest_root.to_path_buf(),
        })
    }

    fn staging_root(&self) -> PathBuf {
        self.txn.path().join("staging")
    }

    fn backup_root(&self) -> PathBuf {
        self.txn.path().join("backup")
    }

    pub fn write_bytes(&self, rel_path: &str, bytes: &[u8]) -> Result<()> {
        let staging_path = self.staging_root().join(rel_path);
        if let Some(parent) = staging_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&staging_path, bytes)
            .with_context(|| format!("write {}", staging_path.display()))?;
        Ok(())
    }

    pub fn write_text(&self, rel_path: &str, text: &str) -> Result<()> {
        self.write_bytes(rel_path, text.as_bytes())
    }

    /// Move every staged file into the destination root.
    ///
    /// Returns the published destination paths, sorted.
    pub fn publish(self) -> Result<Vec<PathBuf>> {
        let staging_root = self.staging_root();
        let backup_root = self.backup_root();
        let files = collect_files_recursive(&staging_root)?;
        let mut published = Vec::new();
        let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
        for file in files {
            let rel = file
                .strip_prefix(&staging_root)
                .context("strip staging prefix")?;
            let dest = self.dest_root.join(rel);
            let step = backup_file(&dest, &backup_root.join(rel)).and_then(|backup| {
                if let Some(backup) = backup {
                    backups.push((dest.clone(), backup));
                }
                publish_file(&file, &dest)
            });
            if let Err(err) = step {
                rollback_publish(&published, &backups);
                return Err(err);
            }
            tracing::debug!(path = %dest.display(), "published");
            published.push(dest);
        }
        Ok(published)
    }
}

pub fn collect_files_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_files_recursive(&path)?);
        } else if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copy an existing destination aside; `None` when there was nothing to keep.
fn backup_file(dest: &Path, backup: &Path) -> Result<Option<PathBuf>> {
    if !dest.exists() {
        return Ok(None);
    }
    if let Some(parent) = backup.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::copy(dest, backup).with_context(|| format!("backup {}", dest.display()))?;
    Ok(Some(backup.to_path_buf()))
}

fn publish_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("staged");
    let tmp_path = dest
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".{file_name}.tmp"));
    fs::copy(source, &tmp_path).with_context(|| format!("publish {}", dest.display()))?;
    fs::rename(&tmp_path, dest).with_context(|| format!("publish {}", dest.display()))?;
    Ok(())
}

/// Best effort: remove what was published, then restore every backup.
fn rollback_publish(published: &[PathBuf], backups: &[(PathBuf, PathBuf)]) {
    for path in published {
        if path.exists() {
            if let Err(err) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %err, "rollback could not remove file");
            }
        }
    }
    for (dest, backup) in backups {
        if let Err(err) = fs::copy(backup, dest) {
            tracing::warn!(path = %dest.display(), error = %err, "rollback could not restore file");
        }
    }
}

/* src/core/src/sink.rs */

// Where generated artifacts land. The engine is agnostic between a shadow
// directory tree on disk and an in-memory virtual-module registry; both
// implement the same contract and are owned exclusively by the engine.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

pub trait ArtifactSink {
  /// Create or overwrite the artifact at `target` (relative path).
  fn write(&mut self, target: &Path, content: &[u8]) -> Result<()>;
  /// Remove the artifact at `target`; absent artifacts are a no-op.
  fn remove(&mut self, target: &Path) -> Result<()>;
  /// Tear down every artifact.
  fn clear(&mut self) -> Result<()>;
  /// Current artifact paths, sorted.
  fn targets(&self) -> Vec<PathBuf>;
}

/// Disk-backed shadow tree rooted at `root`. Writing stamps the artifact's
/// mtime to now, which is what downstream staleness checks need.
#[derive(Debug, Clone)]
pub struct DiskSink {
  root: PathBuf,
}

impl DiskSink {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}

impl ArtifactSink for DiskSink {
  fn write(&mut self, target: &Path, content: &[u8]) -> Result<()> {
    let dest = self.root.join(target);
    if let Some(parent) = dest.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&dest, content).with_context(|| format!("failed to write {}", dest.display()))
  }

  fn remove(&mut self, target: &Path) -> Result<()> {
    let dest = self.root.join(target);
    if !dest.is_file() {
      return Ok(());
    }
    std::fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;

    // Prune now-empty directories up to (not including) the root
    let mut dir = dest.parent();
    while let Some(d) = dir {
      if d == self.root || !d.starts_with(&self.root) {
        break;
      }
      // remove_dir fails on non-empty directories, which ends the pruning
      if std::fs::remove_dir(d).is_err() {
        break;
      }
      dir = d.parent();
    }
    Ok(())
  }

  fn clear(&mut self) -> Result<()> {
    if self.root.exists() {
      std::fs::remove_dir_all(&self.root)
        .with_context(|| format!("failed to remove {}", self.root.display()))?;
    }
    Ok(())
  }

  fn targets(&self) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = WalkDir::new(&self.root)
      .into_iter()
      .filter_map(|e| e.ok())
      .filter(|e| e.file_type().is_file())
      .filter_map(|e| e.path().strip_prefix(&self.root).ok().map(Path::to_path_buf))
      .collect();
    targets.sort();
    targets
  }
}

/// In-memory registry keyed by target path, for hosts that inject virtual
/// modules instead of writing files (and for tests).
#[derive(Debug, Clone, Default)]
pub struct VirtualSink {
  modules: BTreeMap<PathBuf, Vec<u8>>,
}

impl VirtualSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, target: &Path) -> Option<&[u8]> {
    self.modules.get(target).map(Vec::as_slice)
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }
}

impl ArtifactSink for VirtualSink {
  fn write(&mut self, target: &Path, content: &[u8]) -> Result<()> {
    self.modules.insert(target.to_path_buf(), content.to_vec());
    Ok(())
  }

  fn remove(&mut self, target: &Path) -> Result<()> {
    self.modules.remove(target);
    Ok(())
  }

  fn clear(&mut self) -> Result<()> {
    self.modules.clear();
    Ok(())
  }

  fn targets(&self) -> Vec<PathBuf> {
    self.modules.keys().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn disk_write_creates_parents_and_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DiskSink::new(tmp.path().join("out"));

    sink.write(Path::new("es/blog/post.page"), b"v1").unwrap();
    assert_eq!(std::fs::read(tmp.path().join("out/es/blog/post.page")).unwrap(), b"v1");

    // Idempotent overwrite
    sink.write(Path::new("es/blog/post.page"), b"v2").unwrap();
    assert_eq!(std::fs::read(tmp.path().join("out/es/blog/post.page")).unwrap(), b"v2");
  }

  #[test]
  fn disk_remove_prunes_empty_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DiskSink::new(tmp.path().join("out"));
    sink.write(Path::new("es/blog/post.page"), b"x").unwrap();
    sink.write(Path::new("es/home.page"), b"y").unwrap();

    sink.remove(Path::new("es/blog/post.page")).unwrap();
    assert!(!tmp.path().join("out/es/blog").exists());
    // es/ still holds home.page, so it stays
    assert!(tmp.path().join("out/es/home.page").exists());
  }

  #[test]
  fn disk_remove_missing_is_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DiskSink::new(tmp.path().join("out"));
    assert!(sink.remove(Path::new("es/none.page")).is_ok());
  }

  #[test]
  fn disk_clear_removes_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DiskSink::new(tmp.path().join("out"));
    sink.write(Path::new("es/home.page"), b"x").unwrap();

    sink.clear().unwrap();
    assert!(!tmp.path().join("out").exists());
    // Clearing an absent tree is fine too
    assert!(sink.clear().is_ok());
  }

  #[test]
  fn disk_targets_sorted_relative() {
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = DiskSink::new(tmp.path().join("out"));
    sink.write(Path::new("fr/home.page"), b"x").unwrap();
    sink.write(Path::new("es/home.page"), b"x").unwrap();

    assert_eq!(
      sink.targets(),
      vec![PathBuf::from("es/home.page"), PathBuf::from("fr/home.page")]
    );
  }

  #[test]
  fn virtual_roundtrip() {
    let mut sink = VirtualSink::new();
    sink.write(Path::new("es/home.page"), b"hola").unwrap();
    assert_eq!(sink.get(Path::new("es/home.page")), Some(b"hola".as_slice()));

    sink.remove(Path::new("es/home.page")).unwrap();
    assert!(sink.is_empty());
  }
}

/* src/core/src/reconcile.rs */

// Incremental controller. Owns the output map for the life of a watch
// session and mutates exactly the rows a change notification affects,
// keeping artifacts in lockstep. Callers must feed it one change at a time;
// it never spawns work of its own.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::I18nSection;
use crate::map::{self, OutputMap};
use crate::materialize::materialize_entry;
use crate::sink::ArtifactSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
  Created,
  Modified,
  Deleted,
}

#[derive(Debug, Clone)]
pub struct Change {
  pub kind: ChangeKind,
  pub path: PathBuf,
}

/// What one notification did, for the caller to report.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
  pub written: usize,
  pub removed: usize,
  pub ignored: bool,
  pub warnings: Vec<String>,
}

pub struct Reconciler {
  pages_root: PathBuf,
  i18n: I18nSection,
  map: OutputMap,
}

impl Reconciler {
  /// Takes ownership of the initially built map; transitions only make
  /// sense once that full build exists.
  pub fn new(pages_root: PathBuf, i18n: I18nSection, map: OutputMap) -> Self {
    Self { pages_root, i18n, map }
  }

  pub fn map(&self) -> &OutputMap {
    &self.map
  }

  pub fn handle(&mut self, change: &Change, sink: &mut dyn ArtifactSink) -> Result<ReconcileOutcome> {
    let Some(rel) = self.relativize(&change.path) else {
      return Ok(ReconcileOutcome { ignored: true, ..ReconcileOutcome::default() });
    };
    match change.kind {
      ChangeKind::Deleted => self.remove_tracked(&rel, sink),
      ChangeKind::Created | ChangeKind::Modified => self.upsert(&rel, sink),
    }
  }

  /// Paths outside the pages root (or escaping it) are nobody's business.
  fn relativize(&self, path: &Path) -> Option<PathBuf> {
    if let Ok(rel) = path.strip_prefix(&self.pages_root) {
      return Some(rel.to_path_buf());
    }
    if path.is_relative() && !path.starts_with("..") {
      return Some(path.to_path_buf());
    }
    None
  }

  fn upsert(&mut self, rel: &Path, sink: &mut dyn ArtifactSink) -> Result<ReconcileOutcome> {
    let abs = self.pages_root.join(rel);
    if rel.as_os_str().is_empty() || abs.is_dir() {
      return self.resync_subtree(rel, sink);
    }
    if !abs.is_file() {
      // Gone again between the notification and now
      return self.remove_tracked(rel, sink);
    }

    let new_row = map::row_for(rel, &self.i18n);
    let new_targets: BTreeSet<&Path> = new_row.values().map(PathBuf::as_path).collect();
    let mut outcome = ReconcileOutcome::default();

    // Targets the old row held that the new row no longer claims — a
    // translation-table or locale-set change moved them
    if let Some(old_row) = self.map.row(rel) {
      let stale: Vec<PathBuf> =
        old_row.values().filter(|t| !new_targets.contains(t.as_path())).cloned().collect();
      for target in stale {
        sink.remove(&target)?;
        outcome.removed += 1;
      }
    }

    outcome.warnings.extend(self.cross_collisions(rel, &new_targets));

    materialize_entry(&self.pages_root, rel, &new_row, sink)?;
    outcome.written += new_row.len();
    self.map.insert(rel.to_path_buf(), new_row);
    Ok(outcome)
  }

  fn remove_tracked(&mut self, rel: &Path, sink: &mut dyn ArtifactSink) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();
    if let Some(row) = self.map.remove(rel) {
      for target in row.values() {
        sink.remove(target)?;
        outcome.removed += 1;
      }
      return Ok(outcome);
    }

    // Not a tracked file — a deleted directory takes everything under it
    let under = self.map.sources_under(rel);
    if under.is_empty() {
      outcome.ignored = true;
      return Ok(outcome);
    }
    for source in under {
      if let Some(row) = self.map.remove(&source) {
        for target in row.values() {
          sink.remove(target)?;
          outcome.removed += 1;
        }
      }
    }
    Ok(outcome)
  }

  /// Re-run the builder scoped to `prefix` (the whole map when the prefix is
  /// the pages root) and reconcile rows both ways: vanished sources lose
  /// their artifacts, current sources are rematerialized.
  fn resync_subtree(&mut self, prefix: &Path, sink: &mut dyn ArtifactSink) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();
    let rebuilt = map::build_subtree(&self.pages_root, prefix, &self.i18n);
    outcome.warnings.extend(rebuilt.warnings);

    for source in self.map.sources_under(prefix) {
      if rebuilt.map.row(&source).is_some() {
        continue;
      }
      if let Some(row) = self.map.remove(&source) {
        for target in row.values() {
          sink.remove(target)?;
          outcome.removed += 1;
        }
      }
    }

    for (source, new_row) in rebuilt.map.iter() {
      let new_targets: BTreeSet<&Path> = new_row.values().map(PathBuf::as_path).collect();
      if let Some(old_row) = self.map.row(source) {
        let stale: Vec<PathBuf> =
          old_row.values().filter(|t| !new_targets.contains(t.as_path())).cloned().collect();
        for target in stale {
          sink.remove(&target)?;
          outcome.removed += 1;
        }
      }
      // Per-entry degradation: one unreadable source must not stall the rest
      if let Err(e) = materialize_entry(&self.pages_root, source, new_row, sink) {
        outcome.warnings.push(format!("skipping {}: {e}", source.display()));
      } else {
        outcome.written += new_row.len();
      }
      self.map.insert(source.clone(), new_row.clone());
    }

    // Collision check on the settled state, so in-flight renames within the
    // subtree don't produce phantom reports
    outcome.warnings.extend(map::collision_warnings(&self.map));
    Ok(outcome)
  }

  fn cross_collisions(&self, rel: &Path, new_targets: &BTreeSet<&Path>) -> Vec<String> {
    let mut warnings = Vec::new();
    for (other, row) in self.map.iter() {
      if other.as_path() == rel {
        continue;
      }
      for target in row.values() {
        if new_targets.contains(target.as_path()) {
          warnings.push(format!(
            "output collision: {} is produced by both {} and {}; the newest write wins",
            target.display(),
            other.display(),
            rel.display()
          ));
        }
      }
    }
    warnings
  }
}

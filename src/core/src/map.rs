/* src/core/src/map.rs */

// The output map is the engine's single piece of authoritative state: one row
// per source page, mapping each fanned-out locale to its generated location.
// Building it is a pure read-only traversal; materialization is a separate
// pass (see materialize.rs).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::I18nSection;
use crate::translate::translate_file_name;

/// locale -> target path relative to the generated tree root.
pub type OutputRow = BTreeMap<String, PathBuf>;

/// source path (relative to the pages root) -> its per-locale targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputMap {
  rows: BTreeMap<PathBuf, OutputRow>,
}

impl OutputMap {
  pub fn row(&self, source: &Path) -> Option<&OutputRow> {
    self.rows.get(source)
  }

  pub fn insert(&mut self, source: PathBuf, row: OutputRow) -> Option<OutputRow> {
    self.rows.insert(source, row)
  }

  pub fn remove(&mut self, source: &Path) -> Option<OutputRow> {
    self.rows.remove(source)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &OutputRow)> {
    self.rows.iter()
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Total number of generated targets across all rows.
  pub fn target_count(&self) -> usize {
    self.rows.values().map(BTreeMap::len).sum()
  }

  /// Sources at or below `prefix` (an empty prefix matches everything).
  pub fn sources_under(&self, prefix: &Path) -> Vec<PathBuf> {
    self.rows.keys().filter(|source| source.starts_with(prefix)).cloned().collect()
  }

  /// Deterministic, slash-normalized view for the exported manifest.
  pub fn to_manifest(&self) -> BTreeMap<String, BTreeMap<String, String>> {
    self
      .rows
      .iter()
      .map(|(source, row)| {
        (slash(source), row.iter().map(|(locale, target)| (locale.clone(), slash(target))).collect())
      })
      .collect()
  }
}

fn slash(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}

pub struct BuildOutcome {
  pub map: OutputMap,
  pub warnings: Vec<String>,
}

/// Compute one source entry's per-locale targets. Shared by the full build
/// and the reconciler so the two can never disagree on placement: every
/// fanned-out locale (the default included, when configured in) nests under
/// its own locale directory.
pub fn row_for(rel: &Path, i18n: &I18nSection) -> OutputRow {
  let dir = rel.parent().unwrap_or_else(|| Path::new(""));
  let file_name = rel.file_name().and_then(|n| n.to_str()).unwrap_or_default();

  let mut row = OutputRow::new();
  for locale in i18n.fanout_locales() {
    let translated = translate_file_name(&i18n.translations, locale, file_name);
    let target = if dir.as_os_str().is_empty() {
      Path::new(locale).join(translated)
    } else {
      Path::new(locale).join(dir).join(translated)
    };
    row.insert(locale.to_string(), target);
  }
  row
}

/// Walk the whole pages tree once and produce the full output map.
/// Read-only; never touches the file system beyond traversal. A missing
/// pages directory degrades to an empty map plus a warning.
pub fn build_output_map(pages_root: &Path, i18n: &I18nSection) -> BuildOutcome {
  if !pages_root.is_dir() {
    return BuildOutcome {
      map: OutputMap::default(),
      warnings: vec![format!("pages directory not found: {}", pages_root.display())],
    };
  }
  let mut outcome = scan(pages_root, pages_root, i18n);
  outcome.warnings.extend(collision_warnings(&outcome.map));
  outcome
}

/// Scoped variant: map only the files under `pages_root/prefix`, keyed by
/// their path relative to `pages_root`. Used by the reconciler for directory
/// events. A vanished subtree yields an empty map without a warning.
pub fn build_subtree(pages_root: &Path, prefix: &Path, i18n: &I18nSection) -> BuildOutcome {
  let start = pages_root.join(prefix);
  if !start.is_dir() {
    return BuildOutcome { map: OutputMap::default(), warnings: Vec::new() };
  }
  scan(&start, pages_root, i18n)
}

fn scan(start: &Path, pages_root: &Path, i18n: &I18nSection) -> BuildOutcome {
  let mut map = OutputMap::default();
  let mut warnings = Vec::new();
  for entry in WalkDir::new(start) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        warnings.push(format!("skipping unreadable entry: {e}"));
        continue;
      }
    };
    if !entry.file_type().is_file() {
      continue;
    }
    let Ok(rel) = entry.path().strip_prefix(pages_root) else {
      continue;
    };
    map.insert(rel.to_path_buf(), row_for(rel, i18n));
  }
  BuildOutcome { map, warnings }
}

/// Scan the finished map for two rows claiming the same target. The later
/// row (in map order) wins at materialization time; a collision is always
/// reported, never silent.
pub fn collision_warnings(map: &OutputMap) -> Vec<String> {
  let mut claimed: BTreeMap<&Path, &Path> = BTreeMap::new();
  let mut warnings = Vec::new();
  for (source, row) in map.iter() {
    for target in row.values() {
      if let Some(prev) = claimed.insert(target, source) {
        warnings.push(format!(
          "output collision: {} is produced by both {} and {}; the later entry wins",
          target.display(),
          prev.display(),
          source.display()
        ));
      }
    }
  }
  warnings
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::PagefanConfig;

  fn i18n(toml_str: &str) -> I18nSection {
    let config: PagefanConfig = toml::from_str(toml_str).unwrap();
    config.i18n
  }

  fn scenario_i18n(include_default: bool) -> I18nSection {
    i18n(&format!(
      r#"
[project]
name = "test"

[i18n]
locales = ["en", "es"]
default = "en"
include_default = {include_default}

[i18n.translations.es]
home = "inicio"
"#
    ))
  }

  #[test]
  fn row_excludes_default_locale() {
    // Scenario A: only the es target, no en artifact
    let row = row_for(Path::new("home.page"), &scenario_i18n(false));
    assert_eq!(row.len(), 1);
    assert_eq!(row["es"], PathBuf::from("es/inicio.page"));
  }

  #[test]
  fn row_includes_default_locale_when_configured() {
    // Scenario B: en nests under its own folder too
    let row = row_for(Path::new("home.page"), &scenario_i18n(true));
    assert_eq!(row.len(), 2);
    assert_eq!(row["en"], PathBuf::from("en/home.page"));
    assert_eq!(row["es"], PathBuf::from("es/inicio.page"));
  }

  #[test]
  fn row_preserves_directories() {
    let row = row_for(Path::new("blog/post.astro"), &scenario_i18n(false));
    assert_eq!(row["es"], PathBuf::from("es/blog/post.astro"));
  }

  #[test]
  fn build_maps_every_regular_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("home.page"), "x").unwrap();
    std::fs::create_dir_all(tmp.path().join("blog")).unwrap();
    std::fs::write(tmp.path().join("blog/post.page"), "y").unwrap();

    let outcome = build_output_map(tmp.path(), &scenario_i18n(false));
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.map.len(), 2);
    assert!(outcome.map.row(Path::new("home.page")).is_some());
    assert!(outcome.map.row(Path::new("blog/post.page")).is_some());
    // Directories are structural, not entries
    assert!(outcome.map.row(Path::new("blog")).is_none());
  }

  #[test]
  fn build_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("home.page"), "x").unwrap();
    std::fs::write(tmp.path().join("about.page"), "y").unwrap();

    let cfg = scenario_i18n(true);
    let first = build_output_map(tmp.path(), &cfg);
    let second = build_output_map(tmp.path(), &cfg);
    assert_eq!(first.map, second.map);
  }

  #[test]
  fn build_empty_dir_is_empty_map() {
    let tmp = tempfile::tempdir().unwrap();
    let outcome = build_output_map(tmp.path(), &scenario_i18n(false));
    assert!(outcome.map.is_empty());
    assert!(outcome.warnings.is_empty());
  }

  #[test]
  fn build_missing_dir_warns() {
    let tmp = tempfile::tempdir().unwrap();
    let outcome = build_output_map(&tmp.path().join("nope"), &scenario_i18n(false));
    assert!(outcome.map.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("not found"));
  }

  #[test]
  fn collision_is_reported() {
    // home.page translates to inicio.page; inicio.page keeps its name.
    // Both claim es/inicio.page.
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("home.page"), "x").unwrap();
    std::fs::write(tmp.path().join("inicio.page"), "y").unwrap();

    let outcome = build_output_map(tmp.path(), &scenario_i18n(false));
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("output collision"));
    assert!(outcome.warnings[0].contains("es/inicio.page"));
  }

  #[test]
  fn collision_free_table_is_collision_free() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("home.page"), "x").unwrap();
    std::fs::write(tmp.path().join("about.page"), "y").unwrap();

    let outcome = build_output_map(tmp.path(), &scenario_i18n(true));
    assert!(outcome.warnings.is_empty());
  }

  #[test]
  fn subtree_scopes_to_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("home.page"), "x").unwrap();
    std::fs::create_dir_all(tmp.path().join("blog")).unwrap();
    std::fs::write(tmp.path().join("blog/post.page"), "y").unwrap();

    let outcome = build_subtree(tmp.path(), Path::new("blog"), &scenario_i18n(false));
    assert_eq!(outcome.map.len(), 1);
    assert!(outcome.map.row(Path::new("blog/post.page")).is_some());
  }

  #[test]
  fn manifest_uses_forward_slashes() {
    let mut map = OutputMap::default();
    map.insert(
      PathBuf::from("blog").join("post.page"),
      OutputRow::from([("es".to_string(), PathBuf::from("es").join("blog").join("post.page"))]),
    );
    let manifest = map.to_manifest();
    assert_eq!(manifest["blog/post.page"]["es"], "es/blog/post.page");
  }

  #[test]
  fn sources_under_prefix() {
    let mut map = OutputMap::default();
    map.insert(PathBuf::from("home.page"), OutputRow::new());
    map.insert(PathBuf::from("blog/a.page"), OutputRow::new());
    map.insert(PathBuf::from("blog/b.page"), OutputRow::new());

    let under = map.sources_under(Path::new("blog"));
    assert_eq!(under.len(), 2);
    // An empty prefix matches everything
    assert_eq!(map.sources_under(Path::new("")).len(), 3);
  }
}

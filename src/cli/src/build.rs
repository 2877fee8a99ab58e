/* src/cli/src/build.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pagefan_core::PagefanConfig;
use pagefan_core::map::{OutputMap, build_output_map};
use pagefan_core::materialize::materialize_all;
use pagefan_core::sink::DiskSink;

use crate::ui;

/// One-shot fan-out: map the pages tree, materialize the generated tree,
/// export the manifest.
pub fn run_build(config: &PagefanConfig, base_dir: &Path) -> Result<()> {
  ui::banner("build");
  let started = std::time::Instant::now();

  let pages_root = base_dir.join(&config.pages.dir);
  let out_dir = base_dir.join(&config.pages.out_dir);

  ui::step(1, 2, "mapping pages");
  let outcome = build_output_map(&pages_root, &config.i18n);
  for w in &outcome.warnings {
    ui::warn(w);
  }
  ui::detail_ok(&format!(
    "{} pages \u{2192} {} artifacts",
    outcome.map.len(),
    outcome.map.target_count()
  ));

  ui::step(2, 2, "materializing");
  let mut sink = DiskSink::new(&out_dir);
  for w in materialize_all(&pages_root, &outcome.map, &mut sink) {
    ui::warn(&w);
  }
  write_manifest(&outcome.map, &out_dir)?;

  ui::blank();
  ui::ok(&format!("build complete ({:.1}s)", started.elapsed().as_secs_f64()));
  Ok(())
}

/// The manifest lives next to the generated tree, not inside it — the tree
/// holds only per-locale pages.
pub(crate) fn manifest_path(out_dir: &Path) -> PathBuf {
  out_dir.parent().unwrap_or(out_dir).join("pagefan-manifest.json")
}

fn write_manifest(map: &OutputMap, out_dir: &Path) -> Result<()> {
  let path = manifest_path(out_dir);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let json = serde_json::to_string_pretty(&map.to_manifest())?;
  std::fs::write(&path, format!("{json}\n"))
    .with_context(|| format!("failed to write {}", path.display()))?;
  ui::detail_ok("pagefan-manifest.json");
  Ok(())
}

/* src/cli/src/clean.rs */

// `pagefan clean`: removes the generated tree and the exported manifest.
// Both are derived output; missing pieces are a no-op.

use std::path::Path;

use anyhow::{Context, Result};

use pagefan_core::PagefanConfig;

use crate::ui;

pub fn run_clean(config: &PagefanConfig, base_dir: &Path) -> Result<()> {
  ui::arrow("cleaning generated pages");

  let out_dir = base_dir.join(&config.pages.out_dir);
  delete_dir_if_exists(&out_dir)?;

  let manifest = crate::build::manifest_path(&out_dir);
  if manifest.is_file() {
    std::fs::remove_file(&manifest)
      .with_context(|| format!("failed to remove {}", manifest.display()))?;
    ui::detail(&format!("deleted {}", manifest.display()));
  }

  ui::ok("clean complete");
  Ok(())
}

fn delete_dir_if_exists(path: &Path) -> Result<()> {
  if path.exists() {
    std::fs::remove_dir_all(path)
      .with_context(|| format!("failed to remove {}", path.display()))?;
    ui::detail(&format!("deleted {}", path.display()));
  }
  Ok(())
}

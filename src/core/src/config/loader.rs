/* src/core/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::PagefanConfig;

/// Walk upward from `start` to find `pagefan.toml`, like Cargo.toml discovery
pub fn find_pagefan_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join("pagefan.toml");
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("pagefan.toml not found (searched upward from {})", start.display());
    }
  }
}

/// Read and parse the config, rejecting fatally invalid settings.
/// Soft issues (e.g. a default locale missing from the locale set) are
/// returned as warnings for the caller to print.
pub fn load_pagefan_config(path: &Path) -> Result<(PagefanConfig, Vec<String>)> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: PagefanConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  let warnings = config.i18n.validate()?;
  Ok((config, warnings))
}

/* src/core/src/materialize.rs */

use std::path::Path;

use anyhow::{Context, Result};

use crate::map::{OutputMap, OutputRow};
use crate::rewrite::{is_textual, rewrite_imports};
use crate::sink::ArtifactSink;

/// Write one source entry's artifacts: read the source once, rewrite once
/// when textual, and reuse the same bytes for every locale target. Safe to
/// call repeatedly with the same row (idempotent overwrite).
pub fn materialize_entry(
  pages_root: &Path,
  source: &Path,
  row: &OutputRow,
  sink: &mut dyn ArtifactSink,
) -> Result<()> {
  if row.is_empty() {
    return Ok(());
  }
  let abs = pages_root.join(source);
  let bytes = std::fs::read(&abs).with_context(|| format!("failed to read {}", abs.display()))?;

  let bytes = if is_textual(source) {
    match String::from_utf8(bytes) {
      Ok(text) => rewrite_imports(&text).into_bytes(),
      // Claims a textual extension but is not UTF-8: copy verbatim
      Err(raw) => raw.into_bytes(),
    }
  } else {
    bytes
  };

  for target in row.values() {
    sink.write(target, &bytes)?;
  }
  Ok(())
}

/// Full-build variant over the whole map, order-independent across entries.
/// An I/O failure on one entry becomes a warning and leaves the rest of the
/// map unaffected.
pub fn materialize_all(
  pages_root: &Path,
  map: &OutputMap,
  sink: &mut dyn ArtifactSink,
) -> Vec<String> {
  let mut warnings = Vec::new();
  for (source, row) in map.iter() {
    if let Err(e) = materialize_entry(pages_root, source, row, sink) {
      warnings.push(format!("skipping {}: {e}", source.display()));
    }
  }
  warnings
}

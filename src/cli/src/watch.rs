/* src/cli/src/watch.rs */

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::signal;
use tokio::sync::mpsc;

use pagefan_core::PagefanConfig;
use pagefan_core::map::build_output_map;
use pagefan_core::materialize::materialize_all;
use pagefan_core::reconcile::{Change, ChangeKind, Reconciler};
use pagefan_core::sink::{ArtifactSink, DiskSink};

use crate::ui::{self, CYAN, DIM, RED, RESET};

fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
  match kind {
    EventKind::Create(_) => Some(ChangeKind::Created),
    EventKind::Modify(_) => Some(ChangeKind::Modified),
    EventKind::Remove(_) => Some(ChangeKind::Deleted),
    _ => None,
  }
}

fn setup_watcher(tx: mpsc::Sender<Change>) -> Result<RecommendedWatcher> {
  let watcher = RecommendedWatcher::new(
    move |res: std::result::Result<notify::Event, notify::Error>| {
      let Ok(event) = res else { return };
      let Some(kind) = change_kind(&event.kind) else { return };
      for path in event.paths {
        // The watcher thread only forwards; all mutation happens on the
        // single consumer below
        let _ = tx.blocking_send(Change { kind, path });
      }
    },
    notify::Config::default(),
  )?;
  Ok(watcher)
}

/// Initial full build, then mirror changes until Ctrl-C. The generated tree
/// is derived state and is deleted on the way out.
pub async fn run_watch(config: &PagefanConfig, base_dir: &Path) -> Result<()> {
  ui::banner("watch");

  let pages_root = base_dir.join(&config.pages.dir);
  let pages_root = pages_root
    .canonicalize()
    .with_context(|| format!("pages directory not found: {}", pages_root.display()))?;
  let out_dir = base_dir.join(&config.pages.out_dir);

  let outcome = build_output_map(&pages_root, &config.i18n);
  for w in &outcome.warnings {
    ui::warn(w);
  }
  let mut sink = DiskSink::new(&out_dir);
  for w in materialize_all(&pages_root, &outcome.map, &mut sink) {
    ui::warn(&w);
  }
  ui::detail_ok(&format!(
    "{} pages \u{2192} {} artifacts",
    outcome.map.len(),
    outcome.map.target_count()
  ));

  let mut reconciler = Reconciler::new(pages_root.clone(), config.i18n.clone(), outcome.map);

  let (tx, mut rx) = mpsc::channel(64);
  let mut watcher = setup_watcher(tx)?;
  watcher.watch(&pages_root, RecursiveMode::Recursive)?;

  ui::arrow(&format!("watching {}", config.pages.dir));
  ui::detail(&format!("{DIM}Ctrl-C to stop{RESET}"));
  ui::blank();

  // One notification is processed fully before the next is received, so no
  // two mutations can interleave on the same output-map row
  loop {
    tokio::select! {
      _ = signal::ctrl_c() => {
        println!();
        println!("  {DIM}shutting down...{RESET}");
        break;
      }
      Some(change) = rx.recv() => {
        apply_change(&mut reconciler, &change, &pages_root, &mut sink);
      }
    }
  }

  sink.clear()?;
  ui::ok("generated tree removed");
  Ok(())
}

/// A failed reconciliation is reported and skipped; the session keeps
/// running and the affected row stays stale until its next notification.
fn apply_change(
  reconciler: &mut Reconciler,
  change: &Change,
  pages_root: &Path,
  sink: &mut DiskSink,
) {
  let started = Instant::now();
  let shown = change.path.strip_prefix(pages_root).unwrap_or(&change.path);
  match reconciler.handle(change, sink) {
    Ok(outcome) if outcome.ignored => {}
    Ok(outcome) => {
      for w in &outcome.warnings {
        ui::warn(w);
      }
      println!(
        "  {CYAN}[pagefan]{RESET} {} \u{2192} {} written, {} removed ({}ms)",
        shown.display(),
        outcome.written,
        outcome.removed,
        started.elapsed().as_millis()
      );
    }
    Err(e) => println!("  {RED}[pagefan]{RESET} sync error for {}: {e}", shown.display()),
  }
}

/* src/core/src/lib.rs */

pub mod config;
pub mod map;
pub mod materialize;
pub mod reconcile;
pub mod rewrite;
pub mod sink;
pub mod translate;

// Re-exports for ergonomic use
pub use config::{I18nSection, PagefanConfig, TranslationTable};
pub use map::{BuildOutcome, OutputMap, OutputRow, build_output_map, row_for};
pub use reconcile::{Change, ChangeKind, ReconcileOutcome, Reconciler};
pub use sink::{ArtifactSink, DiskSink, VirtualSink};

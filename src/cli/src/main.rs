/* src/cli/src/main.rs */

mod build;
mod clean;
mod ui;
mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pagefan_core::config::{PagefanConfig, find_pagefan_config, load_pagefan_config};

#[derive(Parser)]
#[command(name = "pagefan", about = "Locale fan-out for static-site page trees")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fan the pages tree out into one subtree per locale
  Build {
    /// Path to pagefan.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Build, then mirror page changes into the generated tree until Ctrl-C
  Watch {
    /// Path to pagefan.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Remove the generated tree and manifest
  Clean {
    /// Path to pagefan.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

/// Resolve the config path (explicit or auto-detected), parse it, and print
/// any soft validation warnings. Fatally invalid config stops here, before
/// anything touches the file system.
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, PagefanConfig)> {
  let path = match explicit {
    Some(p) => p,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_pagefan_config(&cwd)?
    }
  };
  let (config, warnings) = load_pagefan_config(&path)?;
  for w in &warnings {
    ui::warn(w);
  }
  Ok((path, config))
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Command::Build { config } => {
      let (config_path, config) = resolve_config(config)?;
      let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
      build::run_build(&config, base_dir)?;
    }
    Command::Watch { config } => {
      let (config_path, config) = resolve_config(config)?;
      let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
      watch::run_watch(&config, base_dir).await?;
    }
    Command::Clean { config } => {
      let (config_path, config) = resolve_config(config)?;
      let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
      clean::run_clean(&config, base_dir)?;
    }
  }

  Ok(())
}

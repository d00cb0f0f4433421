mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ninjaconf_lib::context::ProjectLayout;
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_generate, cmd_options};
use crate::output::{OutputFormat, print_error};

/// ninjaconf - compose ninja build graphs from per-directory Lua modules
#[derive(Parser)]
#[command(name = "ninjaconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project root containing the root configure.lua
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  /// Build output directory, relative to the project root
  #[arg(long, global = true)]
  out: Option<String>,

  /// Fragment output directory, relative to the project root
  #[arg(long, global = true)]
  ninja_out: Option<String>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the ninja fragments (default)
  Generate {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },

  /// Print the merged option store
  Options {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },
}

impl Cli {
  fn layout(&self) -> Result<ProjectLayout> {
    let root = dunce::canonicalize(&self.root)
      .with_context(|| format!("Project root not found: {}", self.root.display()))?;
    let mut layout = ProjectLayout::new(root);
    if let Some(out) = &self.out {
      layout.outdir = out.clone();
    }
    if let Some(ninja_out) = &self.ninja_out {
      layout.ninja_outdir = ninja_out.clone();
    }
    Ok(layout)
  }
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let layout = cli.layout()?;
  let command = cli.command.unwrap_or(Commands::Generate {
    format: OutputFormat::Text,
  });

  match command {
    Commands::Generate { format } => cmd_generate(layout, format),
    Commands::Options { format } => cmd_options(&layout.root, format),
  }
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  if let Err(err) = run(cli) {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}

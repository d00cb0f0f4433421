//! The generation driver.
//!
//! [`generate`] runs one complete generation: it prepares the output
//! directories, loads the option store, seeds the root fragment with the
//! toolchain variables and the generic rules, then hands the root context to
//! the project's root configuration module. The returned [`GenerateReport`]
//! summarizes what was written.

use std::fs;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};

use crate::consts::{CARGO_DEFAULT, CARGO_ENV, LD_DEFAULT, LD_ENV};
use crate::context::{Context, ProjectLayout, Session, cargo_rule};
use crate::error::{Error, Result};
use crate::modules::ModuleResolver;
use crate::option::OptionStore;

/// Programs referenced by the generated rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub cargo: String,
  pub ld: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      cargo: CARGO_DEFAULT.to_string(),
      ld: LD_DEFAULT.to_string(),
    }
  }
}

impl Toolchain {
  /// Read `CARGO` and `LD`, falling back to `cargo` and `ld`.
  pub fn from_env() -> Self {
    let var = |name: &str, default: &str| {
      std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
    };
    Self {
      cargo: var(CARGO_ENV, CARGO_DEFAULT),
      ld: var(LD_ENV, LD_DEFAULT),
    }
  }
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub layout: ProjectLayout,
  pub toolchain: Toolchain,
}

impl GenerateConfig {
  pub fn new(layout: ProjectLayout) -> Self {
    Self {
      layout,
      toolchain: Toolchain::default(),
    }
  }
}

/// Summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
  /// Include path of the root fragment.
  pub root_fragment: String,
  /// Every fragment written, in the order the contexts completed.
  pub fragments: Vec<String>,
  pub rules: usize,
  pub builds: usize,
}

/// Generate the build graph for the project described by `config`.
///
/// Statements already flushed when a later module fails stay on disk; the
/// next run truncates them.
pub fn generate(config: &GenerateConfig, resolver: Box<dyn ModuleResolver>) -> Result<GenerateReport> {
  let layout = &config.layout;
  for dir in [&layout.outdir, &layout.ninja_outdir] {
    let path = layout.root.join(dir);
    fs::create_dir_all(&path).map_err(|source| Error::Io { path, source })?;
  }

  let options = OptionStore::load(&layout.root)?;
  info!(buildmode = %options.build_mode(), options = options.len(), "loaded options");

  let session = Rc::new(Session::new(layout.clone(), options, resolver));
  let mut root = Context::new_root(Rc::clone(&session));

  root.variable("builddir", &layout.outdir, 0)?;
  root.variable(CARGO_ENV, &config.toolchain.cargo, 0)?;
  root.variable(LD_ENV, &config.toolchain.ld, 0)?;
  root.rule(&cargo_rule())?;
  debug!(cargo = %config.toolchain.cargo, ld = %config.toolchain.ld, "registered toolchain");

  root.configure()?;
  let root_fragment = root.finish()?.unwrap_or_default();

  let report = GenerateReport {
    root_fragment,
    fragments: session.written_fragments(),
    rules: session.rule_count(),
    builds: session.build_count(),
  };
  info!(fragments = report.fragments.len(), builds = report.builds, "generation finished");
  Ok(report)
}

//! Configuration module resolution.
//!
//! A configuration module is whatever provides the `config(ctx)` entry point
//! for one source subdirectory. [`ModuleResolver`] is the seam between the
//! context tree and the place modules come from:
//!
//! - [`StaticModules`] - Rust functions registered in-process, keyed by
//!   subdirectory
//! - [`crate::lua::LuaModules`] - `configure.lua` files found in the project
//!   tree

use std::collections::BTreeMap;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::util::path;

pub trait ModuleResolver {
  /// Run the configuration module for `ctx.srcdir()` exactly once.
  ///
  /// Fails with [`Error::ModuleNotFound`] when the subdirectory has no
  /// module.
  fn configure(&self, ctx: &mut Context) -> Result<()>;
}

type ConfigFn = Box<dyn Fn(&mut Context) -> Result<()>>;

/// Registry of configuration functions linked into the binary.
#[derive(Default)]
pub struct StaticModules {
  modules: BTreeMap<String, ConfigFn>,
}

impl StaticModules {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `config` for `srcdir` (`""` is the project root).
  ///
  /// Registering the same subdirectory again replaces the previous function.
  pub fn register<F>(&mut self, srcdir: &str, config: F) -> &mut Self
  where
    F: Fn(&mut Context) -> Result<()> + 'static,
  {
    self.modules.insert(path::normalize(srcdir), Box::new(config));
    self
  }
}

impl ModuleResolver for StaticModules {
  fn configure(&self, ctx: &mut Context) -> Result<()> {
    let config = self.modules.get(ctx.srcdir()).ok_or_else(|| Error::ModuleNotFound {
      srcdir: path::display(ctx.srcdir()).to_string(),
      searched: "the static module registry".to_string(),
    })?;
    config(ctx)
  }
}

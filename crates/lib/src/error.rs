//! Error types for ninjaconf-lib.
//!
//! Every error is fatal to a generation run. Variants that originate inside a
//! configuration module carry the source subdirectory of the failing context
//! (`.` for the root).

use std::path::PathBuf;

use crate::option::OptionError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("no configuration module for '{srcdir}' (looked in {searched})")]
  ModuleNotFound { srcdir: String, searched: String },

  #[error("configuration module for '{srcdir}' is invalid: {reason}")]
  Module { srcdir: String, reason: String },

  #[error("configuration module for '{srcdir}' failed: {source}")]
  Lua {
    srcdir: String,
    #[source]
    source: mlua::Error,
  },

  #[error("cannot initialize the Lua runtime: {0}")]
  Runtime(#[source] mlua::Error),

  #[error("cannot read configuration module {path}: {source}")]
  ReadModule {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Option(#[from] OptionError),

  #[error("unknown option '{key}' requested by '{srcdir}'")]
  UnknownOption { key: String, srcdir: String },

  #[error("output '{output}' declared by '{srcdir}' is already produced by another build edge")]
  DuplicateOutput { output: String, srcdir: String },

  #[error("rule '{rule}' declared by '{srcdir}' is already defined")]
  DuplicateRule { rule: String, srcdir: String },

  #[error("fragment {fragment} for '{srcdir}' was already written in this run")]
  DuplicateFragment { fragment: String, srcdir: String },

  #[error("build edge in '{srcdir}' uses undeclared rule '{rule}'")]
  UnknownRule { rule: String, srcdir: String },

  #[error("invalid statement in '{srcdir}': {reason}")]
  InvalidStatement { srcdir: String, reason: String },

  #[error("'{srcdir}' is already being configured; recursion into it again would never finish")]
  AlreadyActive { srcdir: String },

  #[error("path '{path}' escapes the project root")]
  InvalidPath { path: String },

  #[error("fragment {fragment} is already closed")]
  FragmentClosed { fragment: String },

  #[error("cannot write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

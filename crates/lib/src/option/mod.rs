//! The option store.
//!
//! One flat `name -> value` mapping is built per generation run: the fixed
//! defaults from [`default_options`], overlaid with the declarations of the
//! optional `option.toml` at the project root. The store is shared by
//! reference with every context and never mutated after [`OptionStore::load`].
//!
//! ```toml
//! # option.toml
//! BUILDMODE = "debug"
//! MAPFILE = true
//! BOOTIMAGE = true
//! ```

mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::consts::{BUILDMODE_KEY, OPTION_FILE};

#[derive(Debug, thiserror::Error)]
pub enum OptionError {
  #[error("cannot read option file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed option file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("option '{key}' in {path} has unsupported type {kind} (expected string, boolean or integer)")]
  UnsupportedValue { key: String, kind: String, path: PathBuf },

  #[error("option {key} is invalid: {reason}")]
  InvalidBuildMode { key: String, reason: String },
}

/// The fixed default option mapping.
pub fn default_options() -> BTreeMap<String, OptionValue> {
  let mut options = BTreeMap::new();

  // Build mode: "release" or "debug"
  options.insert(BUILDMODE_KEY.to_string(), OptionValue::from("release"));
  // Default target path for ninja
  options.insert("DEFAULT_TARGET".to_string(), OptionValue::from("target/uniqos.iso"));
  // GRUB module path and image tool used by the ISO packaging rule
  options.insert("GRUB2_MOD_PATH".to_string(), OptionValue::from("/usr/lib/grub/i386-pc"));
  options.insert("GRUB2_MKIMAGE".to_string(), OptionValue::from("grub2-mkimage"));
  options.insert("MAPFILE".to_string(), OptionValue::from(false));
  // Multiboot2 kernel
  options.insert("boot_multiboot2".to_string(), OptionValue::from(true));
  // Bootloader + bootimage kernel
  options.insert("BOOTIMAGE".to_string(), OptionValue::from(false));

  options
}

/// Merged, read-only option mapping shared by every context of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionStore {
  #[serde(flatten)]
  values: BTreeMap<String, OptionValue>,
  #[serde(skip)]
  build_mode: BuildMode,
}

impl OptionStore {
  /// Build a store from explicit defaults and overrides.
  ///
  /// Override entries replace defaults by key; unknown keys are added.
  pub fn merge(
    defaults: BTreeMap<String, OptionValue>,
    overrides: BTreeMap<String, OptionValue>,
  ) -> Result<Self, OptionError> {
    let mut values = defaults;
    values.extend(overrides);
    let build_mode = parse_build_mode(&values)?;
    Ok(Self { values, build_mode })
  }

  /// The defaults alone.
  pub fn defaults() -> Self {
    Self {
      values: default_options(),
      build_mode: BuildMode::Release,
    }
  }

  /// Load the store for the project at `root`.
  ///
  /// A missing `option.toml` leaves the defaults untouched. Any other read
  /// failure, or a malformed file, is an error.
  pub fn load(root: &Path) -> Result<Self, OptionError> {
    let path = root.join(OPTION_FILE);
    let overrides = match fs::read_to_string(&path) {
      Ok(content) => parse_overrides(&content, &path)?,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no option file, using defaults");
        BTreeMap::new()
      }
      Err(source) => return Err(OptionError::Read { path, source }),
    };

    if !overrides.is_empty() {
      info!(count = overrides.len(), path = %path.display(), "applying option overrides");
    }
    Self::merge(default_options(), overrides)
  }

  pub fn get(&self, key: &str) -> Option<&OptionValue> {
    self.values.get(key)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.values.contains_key(key)
  }

  /// Truthiness of an option; an absent key is off.
  pub fn is_enabled(&self, key: &str) -> bool {
    self.values.get(key).is_some_and(OptionValue::is_enabled)
  }

  pub fn build_mode(&self) -> BuildMode {
    self.build_mode
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// Parse the declarations of an option file.
fn parse_overrides(content: &str, path: &Path) -> Result<BTreeMap<String, OptionValue>, OptionError> {
  let table: toml::Table = toml::from_str(content).map_err(|source| OptionError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let mut overrides = BTreeMap::new();
  for (key, value) in table {
    let value = match value {
      toml::Value::String(s) => OptionValue::String(s),
      toml::Value::Boolean(b) => OptionValue::Bool(b),
      toml::Value::Integer(i) => OptionValue::Integer(i),
      other => {
        return Err(OptionError::UnsupportedValue {
          key,
          kind: other.type_str().to_string(),
          path: path.to_path_buf(),
        });
      }
    };
    overrides.insert(key, value);
  }
  Ok(overrides)
}

fn parse_build_mode(values: &BTreeMap<String, OptionValue>) -> Result<BuildMode, OptionError> {
  match values.get(BUILDMODE_KEY) {
    Some(OptionValue::String(s)) => s.parse().map_err(|reason| OptionError::InvalidBuildMode {
      key: BUILDMODE_KEY.to_string(),
      reason,
    }),
    Some(other) => Err(OptionError::InvalidBuildMode {
      key: BUILDMODE_KEY.to_string(),
      reason: format!("expected a string, got {}", other.kind()),
    }),
    None => Err(OptionError::InvalidBuildMode {
      key: BUILDMODE_KEY.to_string(),
      reason: "missing".to_string(),
    }),
  }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single option value.
///
/// Paths are carried as strings; they end up verbatim in fragment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
  Bool(bool),
  Integer(i64),
  String(String),
}

impl OptionValue {
  /// Truthiness used by configuration modules for feature toggles.
  ///
  /// `false`, `0` and the empty string are off; everything else is on.
  pub fn is_enabled(&self) -> bool {
    match self {
      OptionValue::Bool(b) => *b,
      OptionValue::Integer(i) => *i != 0,
      OptionValue::String(s) => !s.is_empty(),
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      OptionValue::Bool(_) => "boolean",
      OptionValue::Integer(_) => "integer",
      OptionValue::String(_) => "string",
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(b) => write!(f, "{}", b),
      OptionValue::Integer(i) => write!(f, "{}", i),
      OptionValue::String(s) => write!(f, "{}", s),
    }
  }
}

impl From<bool> for OptionValue {
  fn from(value: bool) -> Self {
    OptionValue::Bool(value)
  }
}

impl From<i64> for OptionValue {
  fn from(value: i64) -> Self {
    OptionValue::Integer(value)
  }
}

impl From<&str> for OptionValue {
  fn from(value: &str) -> Self {
    OptionValue::String(value.to_string())
  }
}

impl From<String> for OptionValue {
  fn from(value: String) -> Self {
    OptionValue::String(value)
  }
}

/// Value of the `BUILDMODE` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  Debug,
  Release,
}

impl BuildMode {
  pub fn as_str(self) -> &'static str {
    match self {
      BuildMode::Debug => "debug",
      BuildMode::Release => "release",
    }
  }

  pub fn is_release(self) -> bool {
    matches!(self, BuildMode::Release)
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BuildMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "debug" => Ok(BuildMode::Debug),
      "release" => Ok(BuildMode::Release),
      other => Err(format!("expected \"debug\" or \"release\", got \"{}\"", other)),
    }
  }
}

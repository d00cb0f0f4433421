//! Package builds through cargo.
//!
//! A request turns into two edges: a phony placeholder with no inputs, and
//! the real edge running the generic `cargo` rule with the placeholder as its
//! only explicit input. The placeholder is always out of date, so ninja hands
//! every request to cargo, which makes its own incremental decision; the
//! rule's `restat` lets ninja notice when cargo left the artifact untouched
//! and skip downstream work.

use tracing::debug;

use super::Context;
use crate::consts::{CARGO_RULE, PHONY_RULE};
use crate::error::Result;
use crate::ninja::{Build, Rule};
use crate::option::BuildMode;
use crate::util::hash::placeholder_name;

/// A request to build one package artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoBuild {
  /// Artifact path; the output of the real edge.
  pub output: String,
  /// Cargo subcommand (`build`, `xbuild`, `test`, ...).
  pub subcommand: String,
  pub package: Option<String>,
  /// Directory cargo runs in.
  pub dir: String,
  /// Target triple or target specification file.
  pub target: Option<String>,
  /// Linker script; also an implicit input of the edge.
  pub linker_script: Option<String>,
  /// Raw rustflags, appended verbatim.
  pub rustflags: Option<String>,
  pub features: Vec<String>,
  /// Where the linker should write a link map.
  pub map_file: Option<String>,
}

impl CargoBuild {
  pub fn new(output: impl Into<String>, subcommand: impl Into<String>) -> Self {
    Self {
      output: output.into(),
      subcommand: subcommand.into(),
      package: None,
      dir: ".".to_string(),
      target: None,
      linker_script: None,
      rustflags: None,
      features: Vec::new(),
      map_file: None,
    }
  }

  /// Cargo command line options.
  pub fn opts(&self, mode: BuildMode) -> String {
    let mut opts = Vec::new();
    if let Some(pkg) = present(&self.package) {
      opts.push(format!("-p{}", pkg));
    }
    if let Some(target) = present(&self.target) {
      opts.push(format!("--target {}", target));
    }
    let features: Vec<&str> = self.features.iter().map(String::as_str).filter(|f| !f.is_empty()).collect();
    if !features.is_empty() {
      opts.push(format!("--features '{}'", features.join(" ")));
    }
    if mode.is_release() {
      opts.push("--release".to_string());
    }
    opts.join(" ")
  }

  /// Value of `RUSTFLAGS` for the cargo invocation.
  pub fn rustflags(&self) -> String {
    let mut flags = Vec::new();
    if let Some(script) = present(&self.linker_script) {
      flags.push(format!("-Clink-arg=-T{}", script));
    }
    if let Some(map) = present(&self.map_file) {
      flags.push(format!("-Clink-arg=-Map,{}", map));
    }
    if let Some(raw) = present(&self.rustflags) {
      flags.push(raw.to_string());
    }
    flags.join(" ")
  }

  /// The placeholder edge and the cargo edge for this request.
  pub fn edges(&self, mode: BuildMode) -> (Build, Build) {
    let placeholder = placeholder_name(&self.output);
    let guard = Build::new(vec![placeholder.clone()], PHONY_RULE);

    let build = Build {
      inputs: vec![placeholder],
      implicit: present(&self.linker_script).map(str::to_string).into_iter().collect(),
      variables: vec![
        ("dir".to_string(), self.dir.clone()),
        ("sub".to_string(), self.subcommand.clone()),
        ("opts".to_string(), self.opts(mode)),
        ("rustflags".to_string(), self.rustflags()),
      ],
      ..Build::new(vec![self.output.clone()], CARGO_RULE)
    };
    (guard, build)
  }
}

/// The generic package-build rule.
pub fn cargo_rule() -> Rule {
  Rule {
    restat: true,
    ..Rule::new(CARGO_RULE, r#"cd $dir && RUSTFLAGS="$rustflags" $CARGO -q $sub $opts"#)
  }
}

impl Context {
  /// Emit the placeholder and cargo edges for `request`.
  pub fn build_cargo(&mut self, request: &CargoBuild) -> Result<()> {
    let (guard, build) = request.edges(self.buildmode());
    debug!(output = %request.output, placeholder = %guard.outputs[0], "cargo build");
    self.build(&guard)?;
    self.build(&build)
  }
}

fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

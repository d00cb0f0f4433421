//! Implementation of the `ninjaconf generate` command.
//!
//! This command runs the project's configuration modules and writes the
//! ninja fragments. Point ninja at the reported root fragment to build.

use anyhow::Result;
use ninjaconf_lib::context::ProjectLayout;
use ninjaconf_lib::generate::{GenerateConfig, Toolchain, generate};
use ninjaconf_lib::lua::LuaModules;
use tracing::debug;

use super::lib_error;
use crate::output::{OutputFormat, plural, print_json, print_stat, print_success};

pub fn cmd_generate(layout: ProjectLayout, format: OutputFormat) -> Result<()> {
  let config = GenerateConfig {
    layout,
    toolchain: Toolchain::from_env(),
  };
  debug!(root = %config.layout.root.display(), "generating");

  let modules = LuaModules::new(&config.layout.root).map_err(lib_error)?;
  let report = generate(&config, Box::new(modules)).map_err(lib_error)?;

  if format.is_json() {
    return print_json(&report);
  }

  print_success(&format!("Generated {}", plural(report.fragments.len(), "fragment")));
  print_stat("Root", &report.root_fragment);
  print_stat("Rules", &report.rules.to_string());
  print_stat("Builds", &report.builds.to_string());
  Ok(())
}

//! Well-known names and defaults.

/// Configuration module looked up in each source subdirectory.
pub const MODULE_FILE: &str = "configure.lua";

/// Entry point every configuration module must define.
pub const MODULE_ENTRY: &str = "config";

/// Optional option override file, relative to the project root.
pub const OPTION_FILE: &str = "option.toml";

/// Fragment name of the root context.
pub const ROOT_FRAGMENT: &str = "root.ninja";

pub const FRAGMENT_EXT: &str = ".ninja";

pub const DEFAULT_OUT_DIR: &str = "target";

pub const DEFAULT_NINJA_OUT_DIR: &str = "target/ninja";

pub const BUILDMODE_KEY: &str = "BUILDMODE";

/// Generic package-build rule registered in every root fragment.
pub const CARGO_RULE: &str = "cargo";

/// Built-in ninja rule that needs no declaration.
pub const PHONY_RULE: &str = "phony";

/// Environment variable and fallback program for the package-build driver.
pub const CARGO_ENV: &str = "CARGO";
pub const CARGO_DEFAULT: &str = "cargo";

/// Environment variable and fallback program for the linker.
pub const LD_ENV: &str = "LD";
pub const LD_DEFAULT: &str = "ld";

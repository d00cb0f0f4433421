//! ninjaconf-lib: composing ninja build graphs from per-directory modules
//!
//! A project is a tree of source subdirectories, each with a configuration
//! module that describes its slice of the build. This crate provides:
//! - [`context::Context`]: one node of the configuration tree and the
//!   statements it can emit
//! - [`ninja`]: rule and build statements and the lazy fragment files they
//!   are written to
//! - [`option::OptionStore`]: the defaults merged with `option.toml`
//! - [`modules::ModuleResolver`] and [`lua::LuaModules`]: where modules come
//!   from
//! - [`generate::generate`]: the driver tying it together

pub mod consts;
pub mod context;
pub mod error;
pub mod generate;
pub mod lua;
pub mod modules;
pub mod ninja;
pub mod option;
pub mod util;

pub use error::{Error, Result};

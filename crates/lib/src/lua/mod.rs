//! Lua configuration modules.
//!
//! This module provides the Lua side of a generation run: the shared
//! runtime, the private module environments, the `ninja` global table, and
//! the userdata through which modules drive their [`crate::context::Context`].
//!
//! # Submodules
//!
//! - [`context`] - `Context` methods callable from Lua
//! - [`globals`] - The `ninja` global table
//! - [`helpers`] - Helper tables exposed to modules
//! - [`loaders`] - Module loading and entry point lookup
//! - [`modules`] - [`LuaModules`], the `configure.lua` resolver
//! - [`runtime`] - Lua state creation

pub mod context;
pub mod globals;
pub mod helpers;
pub mod loaders;
pub mod modules;
pub mod runtime;

pub use modules::LuaModules;

//! Ninja statements and fragment files.
//!
//! - [`Rule`] and [`Build`] describe `rule` and `build` statements and render
//!   them in ninja syntax.
//! - [`Fragment`] is the lazily-opened file a context writes its statements to.

pub mod fragment;
mod types;

pub use fragment::Fragment;
pub use types::*;

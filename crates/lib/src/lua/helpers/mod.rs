//! Helper tables exposed to configuration modules.

pub mod path;

//! API implementation submodules.
//!
//! Each submodule contains `impl ExplorerApi` blocks that extend the public
//! API. The struct definition remains in `lib.rs`.

mod builder;
mod catalog;
mod images;

pub use builder::ExplorerApiBuilder;

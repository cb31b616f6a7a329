//! Shared utilities for the diskcache workspace
//!
//! Directory resolution and logging setup used by both the library and the
//! command line tool.

pub mod tracing;
pub mod xdg;

pub use xdg::*;

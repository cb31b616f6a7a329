//! Error handling for the disk cache
//!
//! Every store operation reports failures through [`CacheError`]. Each
//! variant carries a [`RecoveryHint`] so callers can decide whether to
//! retry, fix permissions or simply treat the failure as a miss.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;

//! Whole-value store operations

mod get;
mod misc;
mod put;
mod remove;

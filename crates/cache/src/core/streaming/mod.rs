//! Streaming store operations

mod reader;
mod writer;

//! CLI command implementations.

pub mod spoiler;

//! Textual output formats.

pub mod bed;
pub mod chain;

//! CLI module for the folio command-line interface
//!
//! Argument parsing lives in `args`; `commands` bridges parsed arguments to
//! library operations.

pub mod args;
pub mod commands;

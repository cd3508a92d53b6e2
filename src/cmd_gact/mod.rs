//! Subcommand modules for the `gact` binary.

pub mod encode;
pub mod predict;

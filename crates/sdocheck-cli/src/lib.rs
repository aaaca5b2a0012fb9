//! # sdocheck CLI library
//!
//! Command definitions and handlers behind the `sdocheck` binary.

pub mod commands;
pub mod extract;

pub use commands::*;

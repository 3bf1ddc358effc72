//! notecircuit CLI library.
//!
//! This crate provides the core functionality for the notecircuit CLI:
//! input loading and the `validate`, `compile`, and `inspect` commands.

pub mod commands;
pub mod input;

//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, registry
//! access, HTTP downloads and filesystem queries.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod download;
pub mod fs;
pub mod registry;
pub mod wsl;

#[cfg(test)]
pub(crate) mod test_support;

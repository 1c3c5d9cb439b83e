//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod config;
pub mod error;
pub mod install;
pub mod profile;

pub use artifact::{InstallStrategy, classify};
pub use config::LauncherConfig;
pub use error::{ConfigError, InstallError};
pub use install::{InstallOutcome, InstallPhase, InstallRequest};
pub use profile::{DistroFlags, InstanceProfile};

//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims system test suite.
//!
//! # Modules
//!
//! - `fixtures`: canned model completions and extraction payloads
//! - `builders`: builder patterns for test entity construction

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;

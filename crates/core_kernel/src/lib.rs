//! Core Kernel - Foundational types for the claims system
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Strongly-typed entity identifiers
//! - Port abstractions for the hexagonal architecture

pub mod identifiers;
pub mod ports;

pub use identifiers::{ClaimId, DocumentId, HistoryId};
pub use ports::{DomainPort, PortError};

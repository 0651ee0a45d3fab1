//! Repository implementations

pub mod claims;

pub use claims::PgClaimStore;

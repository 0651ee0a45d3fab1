//! Request/Response data transfer objects

pub mod ai;
pub mod claims;
pub mod dashboard;
pub mod documents;

//! Request handlers

pub mod ai;
pub mod claims;
pub mod dashboard;
pub mod documents;
pub mod health;

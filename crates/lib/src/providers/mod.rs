//! # Providers
//!
//! External model providers and the factory that builds them from configuration.

pub mod ai;
pub mod factory;

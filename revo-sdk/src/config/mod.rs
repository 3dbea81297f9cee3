//! Runtime configuration types shared across crates.
//!
//! These types hold validated values. Loading and parsing the config file is
//! handled by the CLI crate.

mod backend;
mod customer;

pub use backend::BackendConfig;
pub use customer::CustomerProfile;

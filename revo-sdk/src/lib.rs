//! Wire types and HTTP client for the Revo Touch design-services backend.
//!
//! The [`objects`] module mirrors the JSON bodies exchanged with the backend
//! and the payment gateway. The [`client`] module (behind the `client`
//! feature) wraps them in a typed `reqwest` client.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;

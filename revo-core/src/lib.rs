#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod draft;
pub mod events;
pub mod finalize;
pub mod payment;
pub mod recorder;
pub mod revision;
pub mod session;
pub mod status;
pub mod utils;

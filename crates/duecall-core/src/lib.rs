//! Duecall core crate - configuration, errors, and reference data.
//!
//! Holds everything the call-time and indexing paths both depend on:
//! the top-level error type, TOML configuration, the customer store,
//! and the call script templates.

pub mod config;
pub mod customer;
pub mod error;
pub mod script;

pub use config::DuecallConfig;
pub use customer::{Customer, CustomerStore};
pub use error::{DuecallError, Result};
pub use script::CallScript;

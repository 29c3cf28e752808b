//! Core types and trait definitions for the rolo contact manager.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing heavier than serde.

pub mod account;
pub mod contact;
pub mod error;
pub mod filter;
pub mod store;
pub mod subscription;

pub use error::{Error, Result};

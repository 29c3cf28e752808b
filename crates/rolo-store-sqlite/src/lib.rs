//! SQLite backend for the rolo contact store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Implements both
//! [`rolo_core::store::ContactStore`] and [`rolo_core::store::AccountStore`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

//! Core types and trait definitions for the matchlog match store.
//!
//! This crate is deliberately free of database and chat-platform
//! dependencies. The SQLite backend, the retention sweeper, and the bot all
//! depend on it.

pub mod error;
pub mod record;
pub mod retention;
pub mod store;
pub mod team;

pub use error::{Error, Result};

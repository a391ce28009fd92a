//! Local storage module for inventory persistence
//!
//! This module provides the SQLite-backed record store (via SeaORM) for:
//! - Inventory items
//! - History events
//! - Key/value settings
//!
//! plus a broadcast change stream that callers can subscribe to.

pub mod db;

pub use db::{LocalStorage, StoreChange};

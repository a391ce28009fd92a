//! Pantry - household food inventory with local/remote reconciliation
//!
//! This library keeps a food inventory in an embedded SQLite database, tracks
//! what is expired or expiring soon, logs usage/discard history, and
//! reconciles the inventory with a per-user remote document collection.
//!
//! # Modules
//!
//! * [`config`] - Application configuration management
//! * [`storage`] - Local database and change stream
//! * [`inventory`] - Product and history operations over local storage
//! * [`remote`] - Remote document store interface and implementations
//! * [`session`] - User identity resolution
//! * [`sync`] - Three-phase reconciliation between local and remote
//! * [`utils`] - Utility functions and helpers

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Inventory and history operations
pub mod inventory;

/// Logging setup and diagnostics buffer
pub mod logger;

/// Remote document store abstraction
pub mod remote;

/// Repository layer for database operations
pub mod repositories;

/// Session and identity resolution
pub mod session;

/// Local storage layer
pub mod storage;

/// Synchronization engine for keeping local and remote data in sync
pub mod sync;

/// Utility functions for dates, quantities and other helpers
pub mod utils;

// Re-export entity models for convenient access
pub use entities::{history_event, inventory_item, setting};

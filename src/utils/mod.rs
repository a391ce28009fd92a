//! Utility modules shared by the inventory and sync layers.
//!
//! - [`datetime`] - Expiration date parsing, expiry classification and timestamps
//! - [`quantity`] - Human-readable quantity descriptions

pub mod datetime;
pub mod quantity;

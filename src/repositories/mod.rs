//! Repository layer for database operations.
//!
//! This module provides repository structs that encapsulate database queries
//! and operations, following the Data Mapper pattern recommended by SeaORM.
//! Repositories keep entities as pure data models while providing reusable
//! database access methods.

pub mod history_event;
pub mod inventory_item;
pub mod setting;

pub use history_event::HistoryRepository;
pub use inventory_item::InventoryRepository;
pub use setting::SettingRepository;

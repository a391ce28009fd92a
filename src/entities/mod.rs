pub mod history_event;
pub mod inventory_item;
pub mod setting;

pub use history_event::Entity as HistoryEvent;
pub use inventory_item::Entity as InventoryItem;
pub use setting::Entity as Setting;

//! Constants used throughout the application
//!
//! This module centralizes magic strings, setting keys, and other constant
//! values to improve maintainability and consistency.

// Settings keys for the persisted session
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_USER_EMAIL: &str = "user_email";
pub const KEY_FIREBASE_UID: &str = "firebase_uid";
pub const KEY_IS_FIREBASE_USER: &str = "is_firebase_user";
pub const KEY_IS_FIRST_LAUNCH: &str = "is_first_launch";

// Session defaults
pub const FALLBACK_USER_PREFIX: &str = "local_";
pub const DEFAULT_USER_NAME: &str = "User";
pub const DEFAULT_USER_EMAIL: &str = "";

// Inventory defaults
pub const DEFAULT_EXPIRING_SOON_DAYS: i64 = 3;
/// Largest accepted look-ahead window for "expiring soon"
pub const MAX_EXPIRING_SOON_DAYS: i64 = 365;
/// Largest accepted auto-sync interval (24 hours)
pub const MAX_AUTO_SYNC_INTERVAL_MINUTES: u64 = 1440;

// Files
pub const CONFIG_FILE_NAME: &str = "pantry.toml";
pub const LOG_FILE_NAME: &str = "pantry.log";

// Log Messages
pub const LOG_SYNC_STARTED: &str = "🔄 Starting reconciliation";
pub const LOG_SYNC_ALREADY_RUNNING: &str = "⏳ Reconciliation already in progress, skipping";

// CLI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const SUCCESS_SYNC_CLEAN: &str = "✅ Sync complete";
pub const WARN_SYNC_ISSUES: &str = "⚠️  Sync finished with issues";

//! Settings, amount formatting and address validation for a Zcash light wallet.
//!
//! This crate provides:
//! - Core domain types and network constants (`types` module)
//! - Address shape classification (`address` module)
//! - Base-unit amount formatting and parsing (`amount` module)
//! - `zcash:` payment URI parsing (`uri` module)
//! - Block explorer links (`explorer` module)
//! - The preference store interface (`store` module)
//! - The settings facade tying it together (`settings` module)
//!
//! With the `persistence` feature enabled:
//! - JSON file store and platform paths (`config` module)
//! - SQLite store (`db` module)

pub mod address;
pub mod amount;
pub mod explorer;
pub mod settings;
pub mod store;
pub mod types;
pub mod uri;

#[cfg(feature = "persistence")]
pub mod config;
#[cfg(feature = "persistence")]
pub mod db;

// Re-export commonly used items from core modules
pub use address::{AddressKind, classify};
pub use amount::{AmountError, format_usd, parse_user_string, to_display_string};
pub use settings::Settings;
pub use store::{MemoryStore, PreferenceStore, PreferenceValue, StoreError};
pub use types::*;
pub use uri::{PaymentUri, PaymentUriError};

// Re-export key persistence types when feature is enabled
#[cfg(feature = "persistence")]
pub use config::JsonFileStore;
#[cfg(feature = "persistence")]
pub use db::SqliteStore;

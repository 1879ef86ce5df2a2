mod cache;
mod catalog;
mod credentials;
mod store;
mod usage;

pub use cache::ResponseCache;
pub use catalog::CATALOG_KEY_PREFIX;
pub use catalog::SavedCatalogs;
pub use credentials::CREDENTIALS_KEY;
pub use credentials::load_credential;
pub use credentials::save_credential;
pub use store::FileStore;
pub use store::KeyValueStore;
pub use store::MemoryStore;
pub use usage::USAGE_KEY;
pub use usage::UsageTelemetry;

// * Configuration: constants, the settings document and its on-disk store

pub mod constants;
pub mod settings;
pub mod store;

// * Re-exports for convenient access
pub use settings::{ConfigError, Settings, TransportOptions};
pub use store::{ConfigStore, PersistenceError};

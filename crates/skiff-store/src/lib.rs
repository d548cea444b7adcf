pub mod database;
pub mod error;
pub mod memory;
pub mod schema;
pub mod settings;

pub use database::Database;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use settings::SettingsRepo;

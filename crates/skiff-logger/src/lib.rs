pub mod config;
pub mod logger;

pub use config::LoggerConfig;
pub use logger::{Logger, DEBUG_TAG};

pub mod config;
pub mod error;
pub mod locale;
pub mod types;

// Infrastructure layer - storage and configuration adapters
pub mod config;
pub mod sqlite_store;

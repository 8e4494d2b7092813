// Core stores
pub mod content_store;
pub mod database;
pub mod session;

// Request-path components
pub mod access;
pub mod http_server;
pub mod upload;

// Background work
pub mod jobs;

// Wiring (configuration, shared state)
pub mod config;
pub mod state;

// Re-exports for the binary and tests
pub use config::Config;
pub use state::{AppState, StateSetupError};

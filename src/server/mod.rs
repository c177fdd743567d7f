//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports
//! ├── state.rs   - AppState and FromRef implementations
//! ├── config.rs  - Configuration loading (database)
//! └── init.rs    - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. Connect the PostgreSQL pool and run migrations
//! 2. Create the notification registry
//! 3. Assemble the router with middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;

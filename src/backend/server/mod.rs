//! Server Module
//!
//! This module hosts the error reporter inside an Axum HTTP server. Route
//! handlers themselves live in the embedding service; this module only
//! provides the shared state, configuration loading and the fallback
//! routes that answer from the error catalog.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Reporter configuration loading
//! └── init.rs   - Router assembly
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: TOML file or environment variables
//! 2. **Reporter Startup**: console sink, budget, remote worker
//! 3. **Router Creation**: health route and fallbacks

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use state::AppState;
pub use init::{create_app, create_router, create_router_with};

//! API Error Module
//!
//! Error taxonomy for the HTTP surface and its conversion to responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Taxonomy
//!
//! - `Validation` - malformed/missing input, 400
//! - `NotFoundOrUnauthorized` - target missing or actor lacks rights, 404
//! - `Unauthenticated` - missing/invalid credential, 403
//! - `Database` / `Internal` - store or unexpected failure, 500
//!
//! "Not found" and "not authorized" are deliberately collapsed into one
//! 404-shaped response so the API never leaks whether a row exists; the
//! distinction is logged server-side where it is known.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ApiError;

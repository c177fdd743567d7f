//! Route configuration

/// Main router assembly
pub mod router;

/// API route configuration
pub mod api_routes;

pub use router::create_router;

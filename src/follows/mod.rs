//! Follow edges
//!
//! Follows are mirrored: an outgoing edge in `followings` and an incoming
//! edge in `followers`, always written and removed together inside one
//! transaction. The HTTP surface is a single toggle endpoint.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

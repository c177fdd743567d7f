//! Toggle-likes
//!
//! Likes on posts, comments and replies share one shape: a link between a
//! user and a target, unique per pair. The operation is a toggle - absent
//! creates, present deletes - and a freshly created like notifies the
//! target's owner.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

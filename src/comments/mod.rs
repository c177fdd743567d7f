//! Comment Tree Management
//!
//! Comments are top-level remarks on a post; replies form an arbitrarily
//! nested tree under them via self-referential `parent_id` links. This
//! module owns create/update/delete for both, including the cascading
//! deletion of whole reply subtrees, and wires mutation events into the
//! notification dispatcher.
//!
//! # Tree invariants
//!
//! - A comment's `post_id` is immutable after creation.
//! - A reply's `parent_id` is fixed at insert and never reassigned, so the
//!   tree is acyclic by construction.
//! - The stored parent is the literal target of the reply; the ancestor
//!   comment is resolved by walking `parent_id` links when notification
//!   context needs it.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use db::{Comment, Reply};

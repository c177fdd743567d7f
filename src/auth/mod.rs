//! Authentication
//!
//! Signup/signin and token issuance live in an external service; this module
//! carries the verification side (JWT claims) and the user lookups the core
//! needs for mention resolution and notification payloads.

/// JWT token verification
pub mod sessions;

/// User model and lookups
pub mod users;

pub use sessions::{verify_token, Claims};
pub use users::{User, UserStub};

//! Shared test fixtures

pub mod database;
pub mod fixtures;

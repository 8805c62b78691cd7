//! Common test utilities for intake tests

pub mod fixtures;

pub use fixtures::TestFixtures;

//! Common test utilities and fixtures for allocator tests

pub mod fixtures;
pub mod helpers;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use helpers::*;

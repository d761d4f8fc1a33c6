//! Testing utilities and mock implementations
//!
//! Lets the service and HTTP layers be exercised against a failing store and a
//! pinned clock.

pub mod mocks;

pub use mocks::*;

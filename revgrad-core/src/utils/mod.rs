//! Shared helpers, mostly for tests.

pub mod testing;

//! Test utilities for the syncwatch dashboard.
//!
//! Provides `StubRelay`, a scriptable in-process stand-in for the relay
//! backend. Import in `#[cfg(test)]` blocks and integration tests only,
//! never in production code.

pub mod relay;

pub use relay::{StubRelay, StubResponse};

//! Domain types shared across the syncwatch workspace.
//!
//! This crate contains only pure types and normalization logic, with no IO
//! or framework dependencies. Transport code hands raw `serde_json::Value`
//! payloads in; everything downstream works on the canonical records.

pub mod dlq;
pub mod id;
pub mod outbox;
pub mod wire;

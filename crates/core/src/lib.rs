//! Core types and pure functions for the bazaar persistence layer.
//!
//! This crate holds everything that does not perform I/O: the record shape and
//! entity declarations, filters and their evaluation, cursor encoding, the
//! page window arithmetic, serialization, and the collaborator traits
//! (document store, cache, event sink, clock) that the `bazaar` crate wires
//! together.

pub mod cache;
pub mod clock;
pub mod error;
pub mod events;
pub mod query;
pub mod record;
pub mod serialization;
pub mod storage;

//! # dashed-adapters
//!
//! Ready-made [`ObjectStore`](dashed_admin::ObjectStore) implementations for
//! the dashed object admin.
//!
//! - [`MemoryStore`]: thread-safe in-memory store for tests, demos and
//!   small datasets

pub mod memory;

pub use memory::{MemoryRecord, MemoryStore};

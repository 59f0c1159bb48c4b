//! Object admin
//!
//! Re-exports the CRUD engine of `dashed-admin` and, with the `adapters`
//! feature, the bundled stores of `dashed-adapters`.

pub use dashed_admin::*;

#[cfg(feature = "adapters")]
pub use dashed_adapters::{MemoryRecord, MemoryStore};

//! The store connection interface.
//!
//! The engines reach the backing store only through [`StoreConnection`]:
//! decoding fetches and queries while resolving references, the facade's
//! conveniences save and page through queries. [`MemoryStore`] is an
//! in-process implementation.

// -----------------------------------------------------------------------------
// Modules

mod connection;
mod error;
mod memory;
mod query;

// -----------------------------------------------------------------------------
// Exports

pub use connection::{StoreConnection, drain_query};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::{Predicate, Query, QueryCursor, QueryPage, QueryResult};

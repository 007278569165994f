#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `::rk_mapper`, including the derives used
// by this crate's own tests.
extern crate self as rk_mapper;

// -----------------------------------------------------------------------------
// Modules

mod convertible;
mod fetch;

pub mod assets;
pub mod convert;
pub mod engine;
pub mod record;
pub mod registry;
pub mod schema;
pub mod store;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use convertible::{EncodedRecord, HookError, RecordConvertible, RecordHooks};
pub use fetch::{FetchError, RecordConvertibleExt, SaveError};
pub use rk_mapper_derive as derive;
pub use rk_task::BoxedFuture;

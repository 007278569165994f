//! The record model shared with the backing store.
//!
//! ## Menu
//!
//! - [`RecordId`]: stable identifier, derived from the record-name field.
//! - [`Record`]: a typed key/value document plus store-managed [`RecordMetadata`].
//! - [`RecordValue`]: the closed set of values a record can hold.
//! - [`RecordReference`]: a pointer to another record with a [`ReferenceAction`].
//! - [`AssetHandle`]: a binary payload stored out-of-line as a file.

// -----------------------------------------------------------------------------
// Modules

mod asset;
mod id;
mod record;
mod reference;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use asset::AssetHandle;
pub use id::RecordId;
pub use record::{Record, RecordMetadata};
pub use reference::{RecordReference, ReferenceAction};
pub use value::RecordValue;

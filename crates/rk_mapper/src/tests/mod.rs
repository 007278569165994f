//! End-to-end tests of derived mappings.

mod mapping;
mod store;

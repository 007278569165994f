#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod cond_send;

// -----------------------------------------------------------------------------
// Exports

pub use cond_send::{BoxedFuture, CondSend, CondSendFuture};

pub use futures_lite::future::block_on;

// -----------------------------------------------------------------------------
// Re-Exports

pub use futures_lite;

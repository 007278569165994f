//! Optional send for wasm support

use core::pin::Pin;

#[cfg(target_arch = "wasm32")]
mod inner {
    /// Use [`CondSend`] to mark an optional Send trait bound.
    /// Store clients on wasm hand out futures that are not Send.
    pub trait CondSend {}
    impl<T> CondSend for T {}
}

#[cfg(not(target_arch = "wasm32"))]
mod inner {
    /// Use [`CondSend`] to mark an optional Send trait bound.
    /// Store clients on wasm hand out futures that are not Send.
    pub trait CondSend: Send {}
    impl<T: Send> CondSend for T {}
}

pub use inner::CondSend;

impl<T: Future + CondSend> CondSendFuture for T {}

/// A future with an optional Send trait bound.
pub trait CondSendFuture: Future + CondSend {}

/// An owned and dynamically typed Future.
///
/// Store calls and record decoding return this so that the store trait stays
/// object safe and recursive record types can await themselves.
pub type BoxedFuture<'a, T> = Pin<Box<dyn CondSendFuture<Output = T> + 'a>>;

//! Items used by code generated with `#[derive(RecordConvertible)]`.
//!
//! Not part of the public API.

pub use core::default::Default;
pub use core::option::Option;
pub use core::result::Result;
pub use std::boxed::Box;
pub use std::string::String;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::RecordConvertible;
    use crate::registry::SchemaRegistry;

    /// A schema registration submitted by `#[record(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut SchemaRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterSchema: RecordConvertible {
        fn __register(registry: &mut SchemaRegistry) {
            if let Err(e) = registry.register::<Self>() {
                log::warn!("cannot register {}: {e}", Self::RECORD_TYPE);
            }
        }
    }

    impl<T: RecordConvertible> __RegisterSchema for T {}

    pub(crate) fn register_schemas(registry: &mut SchemaRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}

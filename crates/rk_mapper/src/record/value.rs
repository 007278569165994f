use std::time::SystemTime;

use crate::record::{AssetHandle, RecordReference};

/// A value stored under one key of a [`Record`](crate::record::Record).
#[derive(Clone, Debug, PartialEq)]
pub enum RecordValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Date(SystemTime),
    Asset(AssetHandle),
    AssetList(Vec<AssetHandle>),
    Reference(RecordReference),
    List(Vec<RecordValue>),
}

impl RecordValue {
    /// A short name for the stored shape, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Int(_) => "Int",
            Self::Double(_) => "Double",
            Self::Bool(_) => "Bool",
            Self::Bytes(_) => "Bytes",
            Self::Date(_) => "Date",
            Self::Asset(_) => "Asset",
            Self::AssetList(_) => "AssetList",
            Self::Reference(_) => "Reference",
            Self::List(_) => "List",
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_date(&self) -> Option<SystemTime> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_asset(&self) -> Option<&AssetHandle> {
        match self {
            Self::Asset(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_asset_list(&self) -> Option<&[AssetHandle]> {
        match self {
            Self::AssetList(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_reference(&self) -> Option<&RecordReference> {
        match self {
            Self::Reference(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[RecordValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for RecordValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_value! {
    String => String,
    i64 => Int,
    f64 => Double,
    bool => Bool,
    Vec<u8> => Bytes,
    SystemTime => Date,
    AssetHandle => Asset,
    RecordReference => Reference,
}

impl From<&str> for RecordValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

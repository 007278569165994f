use std::time::SystemTime;

use crate::record::{RecordReference, RecordValue};

/// A value that can be stored verbatim in a record.
///
/// `from_value` returns `None` when the stored value has a different shape,
/// which the decoder reports as a type mismatch.
///
/// # Example
///
/// ```
/// use rk_mapper::convert::RecordField;
/// use rk_mapper::record::RecordValue;
///
/// assert_eq!(30_u8.to_value(), RecordValue::Int(30));
/// assert_eq!(u8::from_value(&RecordValue::Int(300)), None);
/// assert_eq!(String::from_value(&RecordValue::Int(1)), None);
/// ```
pub trait RecordField: Sized {
    fn to_value(&self) -> RecordValue;

    fn from_value(value: &RecordValue) -> Option<Self>;
}

impl RecordField for String {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::String(self.clone())
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl RecordField for bool {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::Bool(*self)
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! impl_record_field_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RecordField for $ty {
                #[inline]
                fn to_value(&self) -> RecordValue {
                    RecordValue::Int(i64::from(*self))
                }

                #[inline]
                fn from_value(value: &RecordValue) -> Option<Self> {
                    <$ty>::try_from(value.as_int()?).ok()
                }
            }
        )*
    };
}

impl_record_field_int!(i8, i16, i32, i64, u8, u16, u32);

// Stored as the same 64 bits; values above `i64::MAX` read back as
// negative `Int`s.
impl RecordField for u64 {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::Int(*self as i64)
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_int().map(|v| v as u64)
    }
}

impl RecordField for f64 {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::Double(*self)
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_double()
    }
}

impl RecordField for f32 {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::Double(f64::from(*self))
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_double().map(|v| v as f32)
    }
}

impl RecordField for SystemTime {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::Date(*self)
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_date()
    }
}

impl RecordField for RecordReference {
    #[inline]
    fn to_value(&self) -> RecordValue {
        RecordValue::Reference(self.clone())
    }

    #[inline]
    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_reference().cloned()
    }
}

impl<T: RecordField> RecordField for Vec<T> {
    fn to_value(&self) -> RecordValue {
        RecordValue::List(self.iter().map(RecordField::to_value).collect())
    }

    fn from_value(value: &RecordValue) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

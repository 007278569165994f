use crate::convert::RecordField;

/// An enumeration stored through its underlying raw scalar.
///
/// Usually derived with [`derive::RawValue`](crate::derive::RawValue).
///
/// # Example
///
/// ```
/// use rk_mapper::convert::RawValue;
///
/// #[derive(Debug, PartialEq)]
/// enum Tier { Free, Paid }
///
/// impl RawValue for Tier {
///     type Raw = i64;
///
///     fn raw_value(&self) -> i64 {
///         match self { Tier::Free => 0, Tier::Paid => 1 }
///     }
///
///     fn from_raw_value(raw: i64) -> Option<Self> {
///         match raw { 0 => Some(Tier::Free), 1 => Some(Tier::Paid), _ => None }
///     }
/// }
///
/// assert_eq!(Tier::from_raw_value(Tier::Paid.raw_value()), Some(Tier::Paid));
/// assert_eq!(Tier::from_raw_value(9), None);
/// ```
pub trait RawValue: Sized {
    /// The stored scalar type.
    type Raw: RecordField;

    fn raw_value(&self) -> Self::Raw;

    /// Returns `None` if `raw` names no member of the enumeration.
    fn from_raw_value(raw: Self::Raw) -> Option<Self>;
}

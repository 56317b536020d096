//! Enumerations stored as one of their raw primitive values.

use crate::Primitive;

/// A type whose values each correspond to one raw primitive.
pub trait RawRepresentable: Sized {
    /// The primitive the values are stored as.
    type Raw: Primitive;

    /// The raw primitive for this value.
    fn raw_value(&self) -> Self::Raw;

    /// The value for a raw primitive, if there is one.
    fn from_raw_value(raw: &Self::Raw) -> Option<Self>;
}

/// Declares a fieldless enum backed by raw primitive values.
///
/// ```
/// use strata_value::RawRepresentable;
///
/// strata_value::raw_enum! {
///     pub enum City: String {
///         Venice = "venice",
///         Annecy = "annecy",
///         Quark = "quark",
///     }
/// }
///
/// assert_eq!(City::from_raw_value(&"quark".to_string()), Some(City::Quark));
/// assert_eq!(City::Annecy.raw_value(), "annecy");
/// assert_eq!(City::from_raw_value(&"swansea".to_string()), None);
/// ```
#[macro_export]
macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $raw:ty {
            $($variant:ident = $value:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),*
        }

        impl $crate::RawRepresentable for $name {
            type Raw = $raw;

            fn raw_value(&self) -> $raw {
                match self {
                    $($name::$variant => <$raw>::from($value)),*
                }
            }

            fn from_raw_value(raw: &$raw) -> Option<Self> {
                $(
                    if *raw == <$raw>::from($value) {
                        return Some($name::$variant);
                    }
                )*
                None
            }
        }
    };
}

//! The numeric coercion law shared by every reader and writer.
//!
//! Integers and doubles convert into each other only when the conversion is
//! exact, and narrowing integer conversions must fit the target. Nothing is
//! ever truncated or rounded.

use crate::{MappingErrorKind, StructuredValue, Value, ValueKind, from_value};

/// The scalar kinds a leaf can be read as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true` or `false`.
    Bool,
    /// A whole number.
    Int,
    /// A floating-point number.
    Double,
    /// Text.
    String,
}

impl ScalarKind {
    /// Lowercase name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
        }
    }
}

/// A Rust type stored as a single scalar leaf.
pub trait Primitive: Sized {
    /// The kind of leaf this type is read from.
    const HINT: ScalarKind;

    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Convert a scalar [`Value`] into this type.
    fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind>;

    /// Convert this value into a scalar [`Value`].
    fn to_scalar(&self) -> Result<Value, MappingErrorKind>;
}

/// Read a primitive from a node of any backend.
pub fn decode_scalar<P: Primitive, S: StructuredValue>(node: &S) -> Result<P, MappingErrorKind> {
    let scalar = node.scalar(P::HINT)?;
    P::from_scalar(&scalar)
}

/// Build a leaf of any backend from a primitive.
pub fn encode_scalar<P: Primitive, S: StructuredValue>(value: &P) -> Result<S, MappingErrorKind> {
    let scalar = value.to_scalar()?;
    from_value(scalar).map_err(|err| err.kind)
}

fn mismatch(expected: &'static str, got: &Value) -> MappingErrorKind {
    MappingErrorKind::TypeMismatch {
        expected,
        got: got.kind(),
    }
}

fn out_of_range(value: impl ToString, target: &'static str) -> MappingErrorKind {
    MappingErrorKind::NumberOutOfRange {
        value: value.to_string(),
        target,
    }
}

/// The integer a double holds, if it holds one exactly.
fn whole_number(value: f64) -> Option<i128> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i128)
}

macro_rules! integer_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                const HINT: ScalarKind = ScalarKind::Int;
                const NAME: &'static str = stringify!($ty);

                fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind> {
                    match scalar {
                        Value::Int(i) => {
                            <$ty>::try_from(*i).map_err(|_| out_of_range(i, Self::NAME))
                        }
                        Value::Double(d) => {
                            let whole = whole_number(*d).ok_or_else(|| mismatch(Self::NAME, scalar))?;
                            <$ty>::try_from(whole).map_err(|_| out_of_range(d, Self::NAME))
                        }
                        other => Err(mismatch(Self::NAME, other)),
                    }
                }

                fn to_scalar(&self) -> Result<Value, MappingErrorKind> {
                    i64::try_from(*self)
                        .map(Value::Int)
                        .map_err(|_| out_of_range(self, "int"))
                }
            }
        )*
    };
}

integer_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Primitive for f64 {
    const HINT: ScalarKind = ScalarKind::Double;
    const NAME: &'static str = "f64";

    fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind> {
        match scalar {
            Value::Double(d) => Ok(*d),
            Value::Int(i) => {
                let float = *i as f64;
                if float as i128 == i128::from(*i) {
                    Ok(float)
                } else {
                    Err(out_of_range(i, Self::NAME))
                }
            }
            other => Err(mismatch(Self::NAME, other)),
        }
    }

    fn to_scalar(&self) -> Result<Value, MappingErrorKind> {
        Ok(Value::Double(*self))
    }
}

impl Primitive for f32 {
    const HINT: ScalarKind = ScalarKind::Double;
    const NAME: &'static str = "f32";

    fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind> {
        match scalar {
            Value::Double(d) => {
                let float = *d as f32;
                if d.is_nan() || f64::from(float) == *d {
                    Ok(float)
                } else {
                    Err(out_of_range(d, Self::NAME))
                }
            }
            Value::Int(i) => {
                let float = *i as f32;
                if float as i128 == i128::from(*i) {
                    Ok(float)
                } else {
                    Err(out_of_range(i, Self::NAME))
                }
            }
            other => Err(mismatch(Self::NAME, other)),
        }
    }

    fn to_scalar(&self) -> Result<Value, MappingErrorKind> {
        Ok(Value::Double(f64::from(*self)))
    }
}

impl Primitive for bool {
    const HINT: ScalarKind = ScalarKind::Bool;
    const NAME: &'static str = "bool";

    fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind> {
        match scalar {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(Self::NAME, other)),
        }
    }

    fn to_scalar(&self) -> Result<Value, MappingErrorKind> {
        Ok(Value::Bool(*self))
    }
}

impl Primitive for String {
    const HINT: ScalarKind = ScalarKind::String;
    const NAME: &'static str = "string";

    fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind> {
        match scalar {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(Self::NAME, other)),
        }
    }

    fn to_scalar(&self) -> Result<Value, MappingErrorKind> {
        Ok(Value::String(self.clone()))
    }
}

impl Primitive for char {
    const HINT: ScalarKind = ScalarKind::String;
    const NAME: &'static str = "char";

    fn from_scalar(scalar: &Value) -> Result<Self, MappingErrorKind> {
        let Value::String(s) = scalar else {
            return Err(mismatch(Self::NAME, scalar));
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(MappingErrorKind::TypeMismatch {
                expected: Self::NAME,
                got: ValueKind::String,
            }),
        }
    }

    fn to_scalar(&self) -> Result<Value, MappingErrorKind> {
        Ok(Value::String(self.to_string()))
    }
}

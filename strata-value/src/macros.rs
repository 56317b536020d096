/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```
/// use strata_value::{Value, value};
///
/// let tree = value!({ "string": "Rio-2016", "ints": [2, 5, 4], "nest": { "int": 11 }, "gone": null });
/// assert_eq!(tree.as_object().map(|o| o.len()), Some(4));
/// assert_eq!(value!([1, 2]), Value::Array(vec![Value::Int(1), Value::Int(2)]));
/// ```
///
/// Array items and field values are single token trees, so negative numbers
/// need parentheses: `value!([(-1), 2])`.
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([ $($item:tt),* $(,)? ]) => {
        $crate::Value::Array(::std::vec![ $( $crate::value!($item) ),* ])
    };
    ({ $($key:literal : $field:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut object = $crate::Object::new();
        $(
            object.insert(::std::string::String::from($key), $crate::value!($field));
        )*
        $crate::Value::Object(object)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

//! Path components and key spaces.

use std::borrow::Cow;

use core::fmt;
use core::ops::Deref;

/// One step of a path: a field name or an array index.
///
/// A numeric name also answers [`MappingKey::index`], but navigation always
/// addresses objects by name and arrays by index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MappingKey {
    /// A field of an object.
    Name(Cow<'static, str>),
    /// A position in an array.
    Index(usize),
}

impl MappingKey {
    /// A name key borrowing a static string.
    pub const fn from_static(name: &'static str) -> Self {
        MappingKey::Name(Cow::Borrowed(name))
    }

    /// The key as a field name. Indices render as their decimal form.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            MappingKey::Name(name) => Cow::Borrowed(name.as_ref()),
            MappingKey::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// The key as an array position, if it has one.
    pub fn index(&self) -> Option<usize> {
        match self {
            MappingKey::Name(name) => name.parse().ok(),
            MappingKey::Index(index) => Some(*index),
        }
    }

    /// Whether this key addresses an array.
    pub fn is_index(&self) -> bool {
        matches!(self, MappingKey::Index(_))
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingKey::Name(name) => f.write_str(name),
            MappingKey::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for MappingKey {
    fn from(name: &str) -> Self {
        MappingKey::Name(Cow::Owned(name.to_owned()))
    }
}

impl From<String> for MappingKey {
    fn from(name: String) -> Self {
        MappingKey::Name(Cow::Owned(name))
    }
}

impl From<usize> for MappingKey {
    fn from(index: usize) -> Self {
        MappingKey::Index(index)
    }
}

/// The set of keys a mappable type reads and writes.
///
/// Closed key spaces are usually generated with [`key_space!`](crate::key_space);
/// `&str`, `String` and `usize` form open key spaces for ad-hoc paths.
pub trait KeySpace {
    /// The path component this key stands for.
    fn mapping_key(&self) -> MappingKey;
}

impl KeySpace for &str {
    fn mapping_key(&self) -> MappingKey {
        MappingKey::from(*self)
    }
}

impl KeySpace for String {
    fn mapping_key(&self) -> MappingKey {
        MappingKey::from(self.as_str())
    }
}

impl KeySpace for usize {
    fn mapping_key(&self) -> MappingKey {
        MappingKey::Index(*self)
    }
}

impl KeySpace for MappingKey {
    fn mapping_key(&self) -> MappingKey {
        self.clone()
    }
}

/// Declares a closed key space as a fieldless enum.
///
/// Each variant maps to its own name unless a wire name is given:
///
/// ```
/// strata_value::key_space! {
///     pub enum CityKey {
///         Name = "name",
///         NextBigThing = "next-big-thing",
///         Population,
///     }
/// }
///
/// assert_eq!(CityKey::NextBigThing.wire_name(), "next-big-thing");
/// assert_eq!(CityKey::Population.wire_name(), "Population");
/// assert_eq!(CityKey::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! key_space {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident $(= $wire:literal)?),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),*
        }

        impl $name {
            /// Every key of this key space, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// The name this key is stored under.
            pub const fn wire_name(self) -> &'static str {
                match self {
                    $($name::$variant => $crate::key_space!(@wire $variant $(, $wire)?)),*
                }
            }
        }

        impl $crate::KeySpace for $name {
            fn mapping_key(&self) -> $crate::MappingKey {
                $crate::MappingKey::from_static(self.wire_name())
            }
        }
    };
    (@wire $variant:ident, $wire:literal) => {
        $wire
    };
    (@wire $variant:ident) => {
        stringify!($variant)
    };
}

/// An ordered sequence of keys from a tree's root to one of its nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<MappingKey>);

impl Path {
    /// The empty path, addressing the root.
    pub const fn new() -> Self {
        Path(Vec::new())
    }

    /// Append a key at the leaf end.
    pub fn push(&mut self, key: MappingKey) {
        self.0.push(key);
    }

    /// Remove the leaf-most key.
    pub fn pop(&mut self) -> Option<MappingKey> {
        self.0.pop()
    }

    /// Insert a key at the root end.
    pub fn prepend(&mut self, key: MappingKey) {
        self.0.insert(0, key);
    }

    /// Insert several keys at the root end, keeping their order.
    pub fn prepend_all(&mut self, keys: &[MappingKey]) {
        self.0.splice(0..0, keys.iter().cloned());
    }

    /// The keys of this path.
    pub fn as_slice(&self) -> &[MappingKey] {
        &self.0
    }

    /// Consume the path into its keys.
    pub fn into_vec(self) -> Vec<MappingKey> {
        self.0
    }
}

impl Deref for Path {
    type Target = [MappingKey];

    fn deref(&self) -> &[MappingKey] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for key in &self.0 {
            match key {
                MappingKey::Name(name) => write!(f, ".{name}")?,
                MappingKey::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl From<Vec<MappingKey>> for Path {
    fn from(keys: Vec<MappingKey>) -> Self {
        Path(keys)
    }
}

impl From<&[MappingKey]> for Path {
    fn from(keys: &[MappingKey]) -> Self {
        Path(keys.to_vec())
    }
}

impl<const N: usize> From<[MappingKey; N]> for Path {
    fn from(keys: [MappingKey; N]) -> Self {
        Path(keys.into())
    }
}

impl FromIterator<MappingKey> for Path {
    fn from_iter<I: IntoIterator<Item = MappingKey>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a MappingKey;
    type IntoIter = core::slice::Iter<'a, MappingKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

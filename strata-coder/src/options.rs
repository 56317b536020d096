//! Coder configuration.

use crate::NamingPolicy;

/// Options shared by a [`Coder`](crate::Coder)'s encoders and decoders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoderOptions {
    /// Transform from field identifiers to wire keys, used both ways.
    pub naming: NamingPolicy,
}

impl CoderOptions {
    /// Default options: keys are used as written.
    pub const fn new() -> Self {
        Self {
            naming: NamingPolicy::Identity,
        }
    }

    /// Use `policy` to derive wire keys.
    pub const fn naming(mut self, policy: NamingPolicy) -> Self {
        self.naming = policy;
        self
    }
}

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use strata_mapper::*;
pub use strata_value::*;

pub use strata_coder::{
    Coder, CoderOptions, Decode, Decoder, DelegatedEncoder, Encode, Encoder, KeyedDecoder,
    KeyedEncoder, NamingPolicy, SequentialDecoder, SequentialEncoder, SingleValueDecoder,
    SingleValueEncoder,
};

/// One-shot entry points of the container coder with default options.
pub mod coder {
    pub use strata_coder::{from_tree, from_value, to_tree, to_value};
}

/// The JSON backend.
#[cfg(feature = "json")]
pub use strata_json as json;

/// The XML backend.
#[cfg(feature = "xml")]
pub use strata_xml as xml;

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod codec;
mod coder;
mod decoder;
mod encoder;
mod naming;
mod options;

pub use codec::{Decode, Encode};
pub use coder::{Coder, from_tree, from_value, to_tree, to_value};
pub use decoder::{Decoder, KeyedDecoder, SequentialDecoder, SingleValueDecoder};
pub use encoder::{DelegatedEncoder, Encoder, KeyedEncoder, SequentialEncoder, SingleValueEncoder};
pub use naming::NamingPolicy;
pub use options::CoderOptions;

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod error;
mod escaping;
mod node;
mod parser;
mod writer;

pub use error::XmlError;
pub use node::{ITEM_ELEMENT, XmlElement, XmlNode};
pub use parser::{from_slice, from_str};
pub use writer::{XmlWriteOptions, to_string, to_string_with};

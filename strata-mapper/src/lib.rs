#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod element;
mod mapper;
mod out_mapper;

pub use element::{MapDecode, MapDecodeInContext, MapEncode, MapEncodeInContext};
pub use mapper::{ContextInputMappable, ContextualMapper, InputMappable, Mapper};
pub use out_mapper::{ContextOutputMappable, ContextualOutMapper, OutMapper, OutputMappable};

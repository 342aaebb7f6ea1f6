//! Typed values shared by the parser, the compiler and the filter layer.
//!
//! - **Value**: constant values carried by literal nodes and bind parameters
//! - **DataType**: SQL types used for argument contracts and diagnostics

pub mod value;

pub use value::{DataType, Value};

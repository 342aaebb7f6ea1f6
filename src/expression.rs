//! Expression compilation passes.
//!
//! This module provides:
//! - Compile errors
//! - Strict date parsing
//! - Built-in scalar functions and their argument contracts
//! - Bind parameter resolution
//! - Compile-time function folding
//! - Row-level evaluation of the residual predicate

pub mod bind;
pub mod date;
pub mod error;
pub mod eval;
pub mod fold;
pub mod function;

pub use bind::{resolve_binds, BindResolver};
pub use date::{format_date, DateParser};
pub use error::{CompileError, CompileResult};
pub use eval::{column_value, ExpressionEvaluator, Row};
pub use fold::{compile_functions, FunctionCompiler};
pub use function::{FunctionContext, FunctionSignature, ScalarFunction};

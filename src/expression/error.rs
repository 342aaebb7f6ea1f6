//! Error types for expression compilation.

use crate::access::DataType;
use thiserror::Error;

/// Errors that can occur while resolving, compiling or traversing an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A value's type does not satisfy an argument-position contract
    #[error("Type mismatch for {function} argument {position}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        /// 1-based argument position
        position: usize,
        expected: DataType,
        actual: DataType,
    },

    /// A textual value could not be converted to the target type
    #[error("Unable to parse '{input}' as {target}: {reason}")]
    Parse {
        input: String,
        target: DataType,
        reason: String,
    },

    /// A visitor failed for a reason other than the typed kinds above
    #[error("Traversal failed at {node}: {message}")]
    Traversal { node: String, message: String },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// No bound value was supplied for a `?` placeholder
    #[error("No value bound for parameter {}", .index + 1)]
    UnboundParameter { index: usize },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Cannot compare {left} with {right} using {operator}")]
    IncomparableTypes {
        operator: String,
        left: DataType,
        right: DataType,
    },

    #[error("Operator {operator} expects BOOLEAN operands, got {actual}")]
    NonBooleanOperand { operator: String, actual: DataType },

    /// The grammar rejected the statement text
    #[error("Syntax error: {message}")]
    Syntax { message: String },

    /// A pushdown filter could not be encoded or decoded
    #[error("Filter wire encoding failed: {0}")]
    Wire(String),
}

impl CompileError {
    /// Build a traversal error for a node kind
    pub fn traversal(node: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::Traversal {
            node: node.into(),
            message: message.into(),
        }
    }
}

impl From<bincode::Error> for CompileError {
    fn from(err: bincode::Error) -> Self {
        CompileError::Wire(err.to_string())
    }
}

/// Result type for compilation operations
pub type CompileResult<T> = Result<T, CompileError>;

//! Native comparison operators of the storage layer's scan filters.

use crate::parse::CompareOp;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison semantics understood by a storage-side column value filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeCompareOp {
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
}

impl NativeCompareOp {
    /// Token the storage engine uses for this operator
    pub fn token(&self) -> &'static str {
        match self {
            NativeCompareOp::Less => "LESS",
            NativeCompareOp::LessOrEqual => "LESS_OR_EQUAL",
            NativeCompareOp::Equal => "EQUAL",
            NativeCompareOp::NotEqual => "NOT_EQUAL",
            NativeCompareOp::GreaterOrEqual => "GREATER_OR_EQUAL",
            NativeCompareOp::Greater => "GREATER",
        }
    }

    /// Whether a cell passes given its ordering relative to the comparand
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            NativeCompareOp::Less => ordering == Ordering::Less,
            NativeCompareOp::LessOrEqual => ordering != Ordering::Greater,
            NativeCompareOp::Equal => ordering == Ordering::Equal,
            NativeCompareOp::NotEqual => ordering != Ordering::Equal,
            NativeCompareOp::GreaterOrEqual => ordering != Ordering::Less,
            NativeCompareOp::Greater => ordering == Ordering::Greater,
        }
    }
}

impl fmt::Display for NativeCompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl CompareOp {
    /// Native filter operator for this comparison. Keyed on the operator only.
    pub fn filter_op(self) -> NativeCompareOp {
        to_native(self)
    }
}

/// Map a comparison operator to the storage engine's operator
pub fn to_native(op: CompareOp) -> NativeCompareOp {
    match op {
        CompareOp::Equal => NativeCompareOp::Equal,
        CompareOp::NotEqual => NativeCompareOp::NotEqual,
        CompareOp::Less => NativeCompareOp::Less,
        CompareOp::LessOrEqual => NativeCompareOp::LessOrEqual,
        CompareOp::Greater => NativeCompareOp::Greater,
        CompareOp::GreaterOrEqual => NativeCompareOp::GreaterOrEqual,
    }
}

//! Pushdown of compiled predicates to the storage layer.
//!
//! This module provides:
//! - The native comparison operators of storage-side filters
//! - Construction of filter trees and residual predicates

pub mod builder;
pub mod compare_op;

pub use builder::{ColumnValueFilter, FilterBuilder, PushdownFilter, PushdownPlan};
pub use compare_op::{to_native, NativeCompareOp};

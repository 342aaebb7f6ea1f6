//! Parse tree model for SQL predicates.
//!
//! This module provides:
//! - The node model (literals, column references, bind parameters, function
//!   calls, comparisons and boolean junctions)
//! - A factory for building nodes
//! - The enter/leave visitor protocol
//! - Normalization of comparisons into canonical orientation

pub mod factory;
pub mod node;
pub mod normalize;
pub mod operator;
pub mod visitor;

pub use factory::ParseNodeFactory;
pub use node::{
    BindParameterNode, ColumnRefNode, ComparisonNode, FunctionNode, LiteralNode, ParseNode,
};
pub use normalize::{normalize_tree, Normalizer};
pub use operator::CompareOp;
pub use visitor::ParseNodeVisitor;

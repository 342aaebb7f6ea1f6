//! Node construction.

use crate::access::Value;
use crate::parse::node::{
    BindParameterNode, ColumnRefNode, ComparisonNode, FunctionNode, LiteralNode, ParseNode,
};
use crate::parse::operator::CompareOp;

/// Factory for parse nodes.
///
/// The grammar builds every node through a factory so that `?` placeholders are
/// numbered in the order they appear in the statement. Rewrite passes reuse the
/// same factory to build replacement nodes.
#[derive(Debug, Default)]
pub struct ParseNodeFactory {
    bind_count: usize,
}

impl ParseNodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placeholders handed out so far
    pub fn bind_count(&self) -> usize {
        self.bind_count
    }

    pub fn literal(&self, value: Value) -> ParseNode {
        ParseNode::Literal(LiteralNode { value })
    }

    pub fn string(&self, value: impl Into<String>) -> ParseNode {
        self.literal(Value::String(value.into()))
    }

    pub fn int64(&self, value: i64) -> ParseNode {
        self.literal(Value::Int64(value))
    }

    pub fn null(&self) -> ParseNode {
        self.literal(Value::Null)
    }

    pub fn column(&self, name: impl Into<String>) -> ParseNode {
        ParseNode::ColumnRef(ColumnRefNode {
            table: None,
            name: name.into(),
        })
    }

    pub fn qualified_column(&self, table: impl Into<String>, name: impl Into<String>) -> ParseNode {
        ParseNode::ColumnRef(ColumnRefNode {
            table: Some(table.into()),
            name: name.into(),
        })
    }

    /// Next positional placeholder
    pub fn bind(&mut self) -> ParseNode {
        let index = self.bind_count;
        self.bind_count += 1;
        ParseNode::BindParameter(BindParameterNode { index })
    }

    /// Placeholder at an explicit 0-based position
    pub fn bind_at(&self, index: usize) -> ParseNode {
        ParseNode::BindParameter(BindParameterNode { index })
    }

    /// Function call; SQL function names are case-insensitive and stored upper-cased
    pub fn function(&self, name: impl AsRef<str>, args: Vec<ParseNode>) -> ParseNode {
        ParseNode::Function(FunctionNode {
            name: name.as_ref().to_uppercase(),
            args,
        })
    }

    pub fn comparison(&self, op: CompareOp, lhs: ParseNode, rhs: ParseNode) -> ParseNode {
        ParseNode::Comparison(self.comparison_node(op, lhs, rhs))
    }

    pub fn comparison_node(&self, op: CompareOp, lhs: ParseNode, rhs: ParseNode) -> ComparisonNode {
        ComparisonNode::new(op, lhs, rhs)
    }

    /// Conjunction; a single term is returned as-is
    pub fn and(&self, mut terms: Vec<ParseNode>) -> ParseNode {
        if terms.len() == 1 {
            return terms.remove(0);
        }
        ParseNode::And(terms)
    }

    /// Disjunction; a single term is returned as-is
    pub fn or(&self, mut terms: Vec<ParseNode>) -> ParseNode {
        if terms.len() == 1 {
            return terms.remove(0);
        }
        ParseNode::Or(terms)
    }

    pub fn not(&self, operand: ParseNode) -> ParseNode {
        ParseNode::Not(Box::new(operand))
    }
}

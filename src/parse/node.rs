//! Parse tree node definitions.

use crate::access::Value;
use crate::expression::{CompileError, CompileResult};
use crate::parse::operator::CompareOp;
use std::fmt;

/// Constant value in an expression
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub value: Value,
}

/// Unresolved column identifier, optionally qualified by a table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRefNode {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRefNode {
    /// Qualified name as written in the statement
    pub fn full_name(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.name),
            None => self.name.clone(),
        }
    }
}

/// `?` placeholder, resolved to a literal at execution time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindParameterNode {
    /// Position of the placeholder in the statement (0-based)
    pub index: usize,
}

/// Scalar function invocation
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub name: String,
    pub args: Vec<ParseNode>,
}

/// Binary comparison with fixed-position `lhs` and `rhs` operands
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonNode {
    op: CompareOp,
    lhs: Box<ParseNode>,
    rhs: Box<ParseNode>,
}

impl ComparisonNode {
    pub(crate) fn new(op: CompareOp, lhs: ParseNode, rhs: ParseNode) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn lhs(&self) -> &ParseNode {
        &self.lhs
    }

    pub fn rhs(&self) -> &ParseNode {
        &self.rhs
    }

    /// Take ownership of `(lhs, rhs)`
    pub fn into_operands(self) -> (ParseNode, ParseNode) {
        (*self.lhs, *self.rhs)
    }
}

/// Expression tree node.
///
/// Each node owns its children; a tree never shares sub-trees.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Literal(LiteralNode),
    ColumnRef(ColumnRefNode),
    BindParameter(BindParameterNode),
    Function(FunctionNode),
    Comparison(ComparisonNode),
    And(Vec<ParseNode>),
    Or(Vec<ParseNode>),
    Not(Box<ParseNode>),
}

impl ParseNode {
    /// Short name of the node kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ParseNode::Literal(_) => "Literal",
            ParseNode::ColumnRef(_) => "ColumnRef",
            ParseNode::BindParameter(_) => "BindParameter",
            ParseNode::Function(_) => "Function",
            ParseNode::Comparison(_) => "Comparison",
            ParseNode::And(_) => "And",
            ParseNode::Or(_) => "Or",
            ParseNode::Not(_) => "Not",
        }
    }

    /// Ordered children, empty for leaves
    pub fn children(&self) -> Vec<&ParseNode> {
        match self {
            ParseNode::Literal(_) | ParseNode::ColumnRef(_) | ParseNode::BindParameter(_) => {
                vec![]
            }
            ParseNode::Function(func) => func.args.iter().collect(),
            ParseNode::Comparison(cmp) => vec![cmp.lhs(), cmp.rhs()],
            ParseNode::And(terms) | ParseNode::Or(terms) => terms.iter().collect(),
            ParseNode::Not(operand) => vec![operand.as_ref()],
        }
    }

    /// Check if this node is a compile-time constant (contains no column references)
    pub fn is_constant(&self) -> bool {
        match self {
            ParseNode::Literal(_) | ParseNode::BindParameter(_) => true,
            ParseNode::ColumnRef(_) => false,
            _ => self.children().iter().all(|child| child.is_constant()),
        }
    }

    /// The literal value, if this node is a literal
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            ParseNode::Literal(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// Build a node of the same kind over new children.
    ///
    /// Fails when `children` does not match the arity of this node kind.
    pub fn rebuild(&self, children: Vec<ParseNode>) -> CompileResult<ParseNode> {
        match self {
            ParseNode::Literal(_) | ParseNode::ColumnRef(_) | ParseNode::BindParameter(_) => {
                if !children.is_empty() {
                    return Err(arity_error(self, 0, children.len()));
                }
                Ok(self.clone())
            }
            ParseNode::Function(func) => Ok(ParseNode::Function(FunctionNode {
                name: func.name.clone(),
                args: children,
            })),
            ParseNode::Comparison(cmp) => {
                if children.len() != 2 {
                    return Err(arity_error(self, 2, children.len()));
                }
                let mut operands = children.into_iter();
                match (operands.next(), operands.next()) {
                    (Some(lhs), Some(rhs)) => {
                        Ok(ParseNode::Comparison(ComparisonNode::new(cmp.op, lhs, rhs)))
                    }
                    _ => Err(arity_error(self, 2, 0)),
                }
            }
            ParseNode::And(_) => Ok(ParseNode::And(children)),
            ParseNode::Or(_) => Ok(ParseNode::Or(children)),
            ParseNode::Not(_) => {
                if children.len() != 1 {
                    return Err(arity_error(self, 1, children.len()));
                }
                match children.into_iter().next() {
                    Some(operand) => Ok(ParseNode::Not(Box::new(operand))),
                    None => Err(arity_error(self, 1, 0)),
                }
            }
        }
    }
}

fn arity_error(node: &ParseNode, expected: usize, actual: usize) -> CompileError {
    CompileError::traversal(
        node.kind(),
        format!("expected {} children, got {}", expected, actual),
    )
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[ParseNode], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", sep)?;
        }
        write!(f, "{}", term)?;
    }
    write!(f, ")")
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNode::Literal(lit) => write!(f, "{}", lit.value),
            ParseNode::ColumnRef(col) => write!(f, "{}", col.full_name()),
            ParseNode::BindParameter(bind) => write!(f, ":{}", bind.index + 1),
            ParseNode::Function(func) => {
                write!(f, "{}(", func.name)?;
                for (i, arg) in func.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ParseNode::Comparison(cmp) => write!(f, "{} {} {}", cmp.lhs, cmp.op, cmp.rhs),
            ParseNode::And(terms) => write_joined(f, terms, "AND"),
            ParseNode::Or(terms) => write_joined(f, terms, "OR"),
            ParseNode::Not(operand) => write!(f, "NOT {}", operand),
        }
    }
}

//! Row-level evaluation of compiled predicates.
//!
//! This is the residual path: whatever could not be pushed to storage is
//! evaluated here against each returned row, using SQL three-valued logic.

use crate::access::{DataType, Value};
use crate::expression::function::{FunctionContext, ScalarFunction};
use crate::expression::{CompileError, CompileResult};
use crate::parse::{ColumnRefNode, ComparisonNode, ParseNode};
use std::collections::HashMap;

/// Column values keyed by column name
pub type Row = HashMap<String, Value>;

/// Evaluator for parse trees over a single row
pub struct ExpressionEvaluator<'a> {
    row: &'a Row,
    context: FunctionContext,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(row: &'a Row) -> Self {
        Self {
            row,
            context: FunctionContext::default(),
        }
    }

    pub fn with_context(row: &'a Row, context: FunctionContext) -> Self {
        Self { row, context }
    }

    /// Evaluate a node and return the result
    pub fn evaluate(&self, node: &ParseNode) -> CompileResult<Value> {
        match node {
            ParseNode::Literal(lit) => Ok(lit.value.clone()),

            ParseNode::ColumnRef(col) => self.evaluate_column_ref(col),

            ParseNode::BindParameter(bind) => {
                Err(CompileError::UnboundParameter { index: bind.index })
            }

            ParseNode::Function(func) => {
                let function = ScalarFunction::resolve(&func.name)?;
                let args = func
                    .args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<CompileResult<Vec<_>>>()?;
                function.evaluate(&args, &self.context)
            }

            ParseNode::Comparison(cmp) => self.evaluate_comparison(cmp),

            ParseNode::And(terms) => {
                let mut result = Value::Boolean(true);
                for term in terms {
                    match self.evaluate_boolean("AND", term)? {
                        Some(false) => return Ok(Value::Boolean(false)),
                        Some(true) => {}
                        None => result = Value::Null,
                    }
                }
                Ok(result)
            }

            ParseNode::Or(terms) => {
                let mut result = Value::Boolean(false);
                for term in terms {
                    match self.evaluate_boolean("OR", term)? {
                        Some(true) => return Ok(Value::Boolean(true)),
                        Some(false) => {}
                        None => result = Value::Null,
                    }
                }
                Ok(result)
            }

            ParseNode::Not(operand) => Ok(match self.evaluate_boolean("NOT", operand)? {
                Some(b) => Value::Boolean(!b),
                None => Value::Null,
            }),
        }
    }

    /// Evaluate a predicate for a WHERE clause; NULL does not match
    pub fn matches(&self, node: &ParseNode) -> CompileResult<bool> {
        Ok(self.evaluate_boolean("WHERE", node)?.unwrap_or(false))
    }

    fn evaluate_column_ref(&self, col: &ColumnRefNode) -> CompileResult<Value> {
        let full_name = col.full_name();
        column_value(self.row, &full_name)
            .cloned()
            .ok_or(CompileError::UnknownColumn { name: full_name })
    }

    fn evaluate_comparison(&self, cmp: &ComparisonNode) -> CompileResult<Value> {
        let left = self.evaluate(cmp.lhs())?;
        let right = self.evaluate(cmp.rhs())?;
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        match left.compare(&right) {
            Some(ordering) => Ok(Value::Boolean(cmp.op().matches(ordering))),
            None => Err(CompileError::IncomparableTypes {
                operator: cmp.op().as_str().to_string(),
                left: left.data_type().unwrap_or(DataType::Varchar),
                right: right.data_type().unwrap_or(DataType::Varchar),
            }),
        }
    }

    /// `Some(bool)` for a boolean result, `None` for NULL
    fn evaluate_boolean(&self, operator: &str, node: &ParseNode) -> CompileResult<Option<bool>> {
        match self.evaluate(node)? {
            Value::Boolean(b) => Ok(Some(b)),
            Value::Null => Ok(None),
            other => Err(CompileError::NonBooleanOperand {
                operator: operator.to_string(),
                actual: other.data_type().unwrap_or(DataType::Varchar),
            }),
        }
    }
}

/// Look up a column by its qualified name, falling back to the bare name
pub fn column_value<'r>(row: &'r Row, full_name: &str) -> Option<&'r Value> {
    row.get(full_name).or_else(|| {
        full_name
            .rsplit_once('.')
            .and_then(|(_, name)| row.get(name))
    })
}

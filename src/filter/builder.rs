//! Translation of compiled predicates into storage scan filters.
//!
//! Only comparisons in canonical form (column on the left, non-null constant on
//! the right) can be handed to the storage layer. Everything else stays in the
//! residual predicate and is evaluated on the returned rows.

use crate::access::Value;
use crate::expression::{column_value, CompileResult, ExpressionEvaluator, FunctionContext, Row};
use crate::filter::compare_op::NativeCompareOp;
use crate::parse::{ComparisonNode, ParseNode, ParseNodeFactory};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-column filter evaluated by the storage engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValueFilter {
    pub column: String,
    pub op: NativeCompareOp,
    pub value: Value,
    /// Order-preserving encoding of `value`
    pub comparand: Bytes,
}

impl ColumnValueFilter {
    pub fn new(column: impl Into<String>, op: NativeCompareOp, value: Value) -> Self {
        let comparand = value.encode_key();
        Self {
            column: column.into(),
            op,
            value,
            comparand,
        }
    }

    /// Check a row the way the storage engine does: a missing or NULL cell never passes
    pub fn evaluate(&self, row: &Row) -> bool {
        let cell = match column_value(row, &self.column) {
            Some(cell) if !cell.is_null() => cell,
            _ => return false,
        };
        let ordering = if cell.data_type() == self.value.data_type() {
            Some(cell.encode_key().as_ref().cmp(self.comparand.as_ref()))
        } else {
            cell.compare(&self.value)
        };
        ordering.map_or(false, |ordering| self.op.matches(ordering))
    }
}

/// Filter tree shipped to the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PushdownFilter {
    Column(ColumnValueFilter),
    /// Every child must pass
    MustPassAll(Vec<PushdownFilter>),
    /// At least one child must pass
    MustPassOne(Vec<PushdownFilter>),
}

impl PushdownFilter {
    pub fn evaluate(&self, row: &Row) -> bool {
        match self {
            PushdownFilter::Column(filter) => filter.evaluate(row),
            PushdownFilter::MustPassAll(filters) => filters.iter().all(|f| f.evaluate(row)),
            PushdownFilter::MustPassOne(filters) => filters.iter().any(|f| f.evaluate(row)),
        }
    }

    /// Column filters in the tree, in order
    pub fn column_filters(&self) -> Vec<&ColumnValueFilter> {
        match self {
            PushdownFilter::Column(filter) => vec![filter],
            PushdownFilter::MustPassAll(filters) | PushdownFilter::MustPassOne(filters) => {
                filters.iter().flat_map(|f| f.column_filters()).collect()
            }
        }
    }

    pub fn to_wire(&self) -> CompileResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_wire(bytes: &[u8]) -> CompileResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl fmt::Display for PushdownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, filters) = match self {
            PushdownFilter::Column(filter) => {
                return write!(f, "{} {} {}", filter.column, filter.op, filter.value)
            }
            PushdownFilter::MustPassAll(filters) => ("MUST_PASS_ALL", filters),
            PushdownFilter::MustPassOne(filters) => ("MUST_PASS_ONE", filters),
        };
        write!(f, "{}(", name)?;
        for (i, filter) in filters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", filter)?;
        }
        write!(f, ")")
    }
}

/// Split of a predicate between the storage layer and the client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PushdownPlan {
    pub filter: Option<PushdownFilter>,
    pub residual: Option<ParseNode>,
    /// Function settings the residual is evaluated with
    pub context: FunctionContext,
}

impl PushdownPlan {
    /// Whether the storage filter alone decides the predicate
    pub fn is_fully_pushed(&self) -> bool {
        self.residual.is_none()
    }

    /// Apply both halves of the plan to a row
    pub fn matches(&self, row: &Row) -> CompileResult<bool> {
        if let Some(filter) = &self.filter {
            if !filter.evaluate(row) {
                return Ok(false);
            }
        }
        match &self.residual {
            Some(residual) => {
                ExpressionEvaluator::with_context(row, self.context).matches(residual)
            }
            None => Ok(true),
        }
    }
}

/// Builder for pushdown plans
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder {
    enabled: bool,
    context: FunctionContext,
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self {
            enabled: true,
            context: FunctionContext::default(),
        }
    }

    /// Builder that keeps the whole predicate on the client
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Function settings handed to the residual evaluator of every plan
    pub fn with_context(mut self, context: FunctionContext) -> Self {
        self.context = context;
        self
    }

    /// Split a normalized predicate into a storage filter and a residual.
    ///
    /// Top-level conjuncts are considered one by one; nested junctions are
    /// pushed only when every term in them is pushable.
    pub fn build(&self, predicate: &ParseNode) -> PushdownPlan {
        if !self.enabled {
            return PushdownPlan {
                filter: None,
                residual: Some(predicate.clone()),
                context: self.context,
            };
        }

        let conjuncts: Vec<&ParseNode> = match predicate {
            ParseNode::And(terms) => terms.iter().collect(),
            other => vec![other],
        };

        let mut pushed = Vec::new();
        let mut residual = Vec::new();
        for conjunct in conjuncts {
            match Self::to_filter(conjunct) {
                Some(filter) => pushed.push(filter),
                None => residual.push(conjunct.clone()),
            }
        }

        let filter = match pushed.len() {
            0 => None,
            1 => pushed.pop(),
            _ => Some(PushdownFilter::MustPassAll(pushed)),
        };
        let residual = if residual.is_empty() {
            None
        } else {
            Some(ParseNodeFactory::new().and(residual))
        };

        let plan = PushdownPlan {
            filter,
            residual,
            context: self.context,
        };
        log::debug!(
            "pushdown filter: {}, residual: {}",
            plan.filter
                .as_ref()
                .map_or("none".to_string(), |f| f.to_string()),
            plan.residual
                .as_ref()
                .map_or("none".to_string(), |r| r.to_string())
        );
        plan
    }

    fn to_filter(node: &ParseNode) -> Option<PushdownFilter> {
        match node {
            ParseNode::Comparison(cmp) => Self::column_filter(cmp).map(PushdownFilter::Column),
            ParseNode::And(terms) => Self::to_filters(terms).map(PushdownFilter::MustPassAll),
            ParseNode::Or(terms) => Self::to_filters(terms).map(PushdownFilter::MustPassOne),
            _ => None,
        }
    }

    fn to_filters(terms: &[ParseNode]) -> Option<Vec<PushdownFilter>> {
        terms.iter().map(Self::to_filter).collect()
    }

    fn column_filter(cmp: &ComparisonNode) -> Option<ColumnValueFilter> {
        match (cmp.lhs(), cmp.rhs().as_literal()) {
            (ParseNode::ColumnRef(col), Some(value)) if !value.is_null() => Some(
                ColumnValueFilter::new(col.full_name(), cmp.op().filter_op(), value.clone()),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::CompareOp;

    fn row(values: &[(&str, Value)]) -> Row {
        values
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_single_comparison_is_pushed() {
        let factory = ParseNodeFactory::new();
        let predicate = factory.comparison(
            CompareOp::Less,
            factory.column("x_integer"),
            factory.int64(10),
        );

        let plan = FilterBuilder::new().build(&predicate);
        assert!(plan.is_fully_pushed());
        assert_eq!(
            plan.filter,
            Some(PushdownFilter::Column(ColumnValueFilter::new(
                "x_integer",
                NativeCompareOp::Less,
                Value::Int64(10),
            )))
        );
    }

    #[test]
    fn test_conjunction_splits_residual() {
        let factory = ParseNodeFactory::new();
        let predicate = factory.and(vec![
            factory.comparison(CompareOp::GreaterOrEqual, factory.column("a"), factory.int64(1)),
            factory.comparison(CompareOp::Equal, factory.column("a"), factory.column("b")),
            factory.comparison(CompareOp::LessOrEqual, factory.column("a"), factory.int64(9)),
        ]);

        let plan = FilterBuilder::new().build(&predicate);
        let filter = plan.filter.clone().unwrap();
        assert_eq!(filter.to_string(), "MUST_PASS_ALL(a GREATER_OR_EQUAL 1, a LESS_OR_EQUAL 9)");
        assert_eq!(plan.residual.as_ref().unwrap().to_string(), "a = b");

        assert!(plan
            .matches(&row(&[("a", Value::Int64(5)), ("b", Value::Int64(5))]))
            .unwrap());
        assert!(!plan
            .matches(&row(&[("a", Value::Int64(5)), ("b", Value::Int64(6))]))
            .unwrap());
        assert!(!plan
            .matches(&row(&[("a", Value::Int64(10)), ("b", Value::Int64(10))]))
            .unwrap());
    }

    #[test]
    fn test_disjunction_needs_every_term() {
        let factory = ParseNodeFactory::new();
        let pushable = factory.or(vec![
            factory.comparison(CompareOp::Equal, factory.column("a"), factory.int64(1)),
            factory.comparison(CompareOp::Equal, factory.column("a"), factory.int64(2)),
        ]);
        let plan = FilterBuilder::new().build(&pushable);
        assert!(matches!(plan.filter, Some(PushdownFilter::MustPassOne(_))));
        assert!(plan.is_fully_pushed());

        let mixed = factory.or(vec![
            factory.comparison(CompareOp::Equal, factory.column("a"), factory.int64(1)),
            factory.not(factory.comparison(
                CompareOp::Equal,
                factory.column("a"),
                factory.int64(2),
            )),
        ]);
        let plan = FilterBuilder::new().build(&mixed);
        assert_eq!(plan.filter, None);
        assert_eq!(plan.residual, Some(mixed));
    }

    #[test]
    fn test_null_constant_and_functions_stay_residual() {
        let factory = ParseNodeFactory::new();
        let predicate = factory.and(vec![
            factory.comparison(CompareOp::Equal, factory.column("a"), factory.null()),
            factory.comparison(
                CompareOp::Equal,
                factory.function("TO_CHAR", vec![factory.column("d")]),
                factory.string("1970-01-01 00:00:00"),
            ),
        ]);

        let plan = FilterBuilder::new().build(&predicate);
        assert_eq!(plan.filter, None);
        assert_eq!(plan.residual, Some(predicate));
    }

    #[test]
    fn test_disabled_builder() {
        let factory = ParseNodeFactory::new();
        let predicate = factory.comparison(CompareOp::Equal, factory.column("a"), factory.int64(1));

        let plan = FilterBuilder::disabled().build(&predicate);
        assert_eq!(plan.filter, None);
        assert_eq!(plan.residual, Some(predicate));
    }

    #[test]
    fn test_column_filter_evaluation() {
        let filter = ColumnValueFilter::new("a", NativeCompareOp::GreaterOrEqual, Value::Int64(-3));
        assert!(filter.evaluate(&row(&[("a", Value::Int64(-3))])));
        assert!(filter.evaluate(&row(&[("a", Value::Int64(7))])));
        assert!(!filter.evaluate(&row(&[("a", Value::Int64(-4))])));
        // Mixed numeric types fall back to value comparison
        assert!(filter.evaluate(&row(&[("a", Value::Double(-2.5))])));
        assert!(!filter.evaluate(&row(&[("a", Value::Null)])));
        assert!(!filter.evaluate(&row(&[("b", Value::Int64(1))])));
        assert!(!filter.evaluate(&row(&[("a", Value::String("x".to_string()))])));
    }

    #[test]
    fn test_wire_format() {
        let filter = PushdownFilter::MustPassAll(vec![
            PushdownFilter::Column(ColumnValueFilter::new(
                "a",
                NativeCompareOp::Greater,
                Value::Int64(1),
            )),
            PushdownFilter::Column(ColumnValueFilter::new(
                "s",
                NativeCompareOp::NotEqual,
                Value::String("x".to_string()),
            )),
        ]);

        let bytes = filter.to_wire().unwrap();
        assert_eq!(PushdownFilter::from_wire(&bytes).unwrap(), filter);
        assert!(PushdownFilter::from_wire(&[0xff, 0xff]).is_err());
    }

    #[test]
    fn test_qualified_column_is_pushed_with_its_table() {
        let factory = ParseNodeFactory::new();
        let predicate = factory.comparison(
            CompareOp::Equal,
            factory.qualified_column("t", "b"),
            factory.int64(2),
        );

        let plan = FilterBuilder::new().build(&predicate);
        let filter = plan.filter.clone().unwrap();
        assert_eq!(filter.column_filters()[0].column, "t.b");

        // The qualified cell wins over the bare one, as in row evaluation
        let both = row(&[("t.b", Value::Int64(2)), ("b", Value::Int64(7))]);
        assert!(filter.evaluate(&both));
        assert_eq!(
            plan.matches(&both).unwrap(),
            ExpressionEvaluator::new(&both).matches(&predicate).unwrap()
        );
        assert!(filter.evaluate(&row(&[("b", Value::Int64(2))])));
        assert!(!filter.evaluate(&row(&[("b", Value::Int64(7))])));
    }

    #[test]
    fn test_sub_millisecond_dates_agree_with_evaluation() {
        let midnight = chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let cell = row(&[(
            "x",
            Value::Date(midnight + chrono::Duration::microseconds(500)),
        )]);
        let factory = ParseNodeFactory::new();

        for (op, expected) in [
            (CompareOp::Equal, false),
            (CompareOp::Greater, true),
            (CompareOp::LessOrEqual, false),
        ] {
            let predicate =
                factory.comparison(op, factory.column("x"), factory.literal(Value::Date(midnight)));
            let plan = FilterBuilder::new().build(&predicate);
            assert!(plan.is_fully_pushed());
            assert_eq!(plan.matches(&cell).unwrap(), expected, "{}", predicate);
            assert_eq!(
                ExpressionEvaluator::new(&cell).matches(&predicate).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_nan_agrees_with_evaluation() {
        let factory = ParseNodeFactory::new();
        let rows = [
            row(&[("x", Value::Double(1.0))]),
            row(&[("x", Value::Double(f64::NAN))]),
            row(&[("x", Value::Int64(3))]),
        ];

        for constant in [Value::Double(f64::NAN), Value::Double(2.0)] {
            for op in CompareOp::ALL {
                let predicate =
                    factory.comparison(op, factory.column("x"), factory.literal(constant.clone()));
                let plan = FilterBuilder::new().build(&predicate);
                for cell in &rows {
                    assert_eq!(
                        plan.matches(cell).unwrap(),
                        ExpressionEvaluator::new(cell).matches(&predicate).unwrap(),
                        "{} on {:?}",
                        predicate,
                        cell
                    );
                }
            }
        }
    }

    #[test]
    fn test_residual_uses_builder_context() {
        let factory = ParseNodeFactory::new();
        let predicate = factory.comparison(
            CompareOp::Less,
            factory.column("d"),
            factory.function("TO_DATE", vec![factory.string("1970-1-2")]),
        );
        let strict = FunctionContext {
            date_parser: crate::expression::DateParser::new(false),
        };

        let plan = FilterBuilder::new().with_context(strict).build(&predicate);
        assert_eq!(plan.context, strict);
        let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let cell = row(&[("d", Value::Date(epoch))]);
        assert!(plan.matches(&cell).is_err());
        assert!(FilterBuilder::new().build(&predicate).matches(&cell).unwrap());
    }
}

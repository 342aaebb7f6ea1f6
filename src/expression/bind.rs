//! Substitution of `?` placeholders with bound values.

use crate::access::Value;
use crate::expression::function::ScalarFunction;
use crate::expression::{CompileError, CompileResult};
use crate::parse::{ParseNode, ParseNodeFactory, ParseNodeVisitor};
use std::collections::BTreeSet;

/// Replaces every bind parameter with a literal holding its bound value.
///
/// A value bound directly as a function argument must carry exactly the type
/// the function declares for that position, e.g. `TO_DATE(?)` only accepts a
/// VARCHAR bind.
pub struct BindResolver<'a> {
    binds: &'a [Value],
    factory: &'a ParseNodeFactory,
    seen: BTreeSet<usize>,
}

impl<'a> BindResolver<'a> {
    pub fn new(binds: &'a [Value], factory: &'a ParseNodeFactory) -> Self {
        Self {
            binds,
            factory,
            seen: BTreeSet::new(),
        }
    }

    /// Distinct placeholder positions encountered so far
    pub fn placeholders(&self) -> usize {
        self.seen.len()
    }

    fn bound(&self, index: usize) -> CompileResult<&'a Value> {
        self.binds
            .get(index)
            .ok_or(CompileError::UnboundParameter { index })
    }
}

impl ParseNodeVisitor for BindResolver<'_> {
    type Output = ParseNode;

    fn visit_leave(
        &mut self,
        node: &ParseNode,
        children: Vec<ParseNode>,
    ) -> CompileResult<ParseNode> {
        match node {
            ParseNode::BindParameter(bind) => {
                self.seen.insert(bind.index);
                let value = self.bound(bind.index)?;
                Ok(self.factory.literal(value.clone()))
            }
            ParseNode::Function(func) => {
                if let Some(function) = ScalarFunction::lookup(&func.name) {
                    for (position, arg) in func.args.iter().enumerate() {
                        if let ParseNode::BindParameter(bind) = arg {
                            function.check_bound_argument(position, self.bound(bind.index)?)?;
                        }
                    }
                }
                node.rebuild(children)
            }
            _ => node.rebuild(children),
        }
    }
}

/// Resolve every placeholder in `node` against `binds` (0-based)
pub fn resolve_binds(
    node: &ParseNode,
    binds: &[Value],
    factory: &ParseNodeFactory,
) -> CompileResult<ParseNode> {
    let mut resolver = BindResolver::new(binds, factory);
    let resolved = node.accept(&mut resolver)?;
    if binds.len() > resolver.placeholders() {
        log::warn!(
            "{} values bound but the expression has {} placeholders; extra values are ignored",
            binds.len(),
            resolver.placeholders()
        );
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DataType;
    use crate::parse::CompareOp;
    use chrono::NaiveDate;

    #[test]
    fn test_resolves_placeholders_in_order() {
        let mut factory = ParseNodeFactory::new();
        let first = factory.bind();
        let second = factory.bind();
        let tree = factory.and(vec![
            factory.comparison(CompareOp::Equal, factory.column("a"), first),
            factory.comparison(CompareOp::Less, factory.column("b"), second),
        ]);

        let resolved =
            resolve_binds(&tree, &[Value::Int64(1), Value::Int64(2)], &factory).unwrap();
        assert_eq!(resolved.to_string(), "(a = 1 AND b < 2)");
    }

    #[test]
    fn test_varchar_bind_inside_to_date() {
        let mut factory = ParseNodeFactory::new();
        let bind = factory.bind();
        let tree = factory.comparison(
            CompareOp::Less,
            factory.column("a_date"),
            factory.function("TO_DATE", vec![bind]),
        );

        let resolved = resolve_binds(
            &tree,
            &[Value::String("1970-1-1 12:00:00".to_string())],
            &factory,
        )
        .unwrap();
        assert_eq!(
            resolved.to_string(),
            "a_date < TO_DATE('1970-1-1 12:00:00')"
        );
    }

    #[test]
    fn test_date_bind_inside_to_date_is_rejected() {
        let mut factory = ParseNodeFactory::new();
        let bind = factory.bind();
        let tree = factory.comparison(
            CompareOp::Less,
            factory.column("a_date"),
            factory.function("TO_DATE", vec![bind]),
        );

        let date = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = resolve_binds(&tree, &[Value::Date(date)], &factory).unwrap_err();
        assert_eq!(
            err,
            CompileError::TypeMismatch {
                function: "TO_DATE".to_string(),
                position: 1,
                expected: DataType::Varchar,
                actual: DataType::Date,
            }
        );
        assert!(err.to_string().contains("Type mismatch for TO_DATE argument"));
    }

    #[test]
    fn test_null_bind_is_accepted() {
        let mut factory = ParseNodeFactory::new();
        let bind = factory.bind();
        let tree = factory.function("TO_DATE", vec![bind]);

        let resolved = resolve_binds(&tree, &[Value::Null], &factory).unwrap();
        assert_eq!(resolved, factory.function("TO_DATE", vec![factory.null()]));
    }

    #[test]
    fn test_missing_bind() {
        let mut factory = ParseNodeFactory::new();
        let _ = factory.bind();
        let second = factory.bind();
        let tree = factory.comparison(CompareOp::Equal, factory.column("a"), second);

        let err = resolve_binds(&tree, &[Value::Int64(1)], &factory).unwrap_err();
        assert_eq!(err, CompileError::UnboundParameter { index: 1 });
    }

    #[test]
    fn test_surplus_binds_are_ignored() {
        let mut factory = ParseNodeFactory::new();
        let bind = factory.bind();
        let tree = factory.comparison(CompareOp::Equal, factory.column("a"), bind);

        let resolved = resolve_binds(
            &tree,
            &[Value::Int64(1), Value::String("unused".to_string())],
            &factory,
        )
        .unwrap();
        assert_eq!(resolved.to_string(), "a = 1");
    }

    #[test]
    fn test_repeated_placeholder_counts_once() {
        let factory = ParseNodeFactory::new();
        let tree = factory.or(vec![
            factory.comparison(CompareOp::Equal, factory.column("a"), factory.bind_at(0)),
            factory.comparison(CompareOp::Equal, factory.column("b"), factory.bind_at(0)),
        ]);

        let binds = [Value::Int64(7)];
        let mut resolver = BindResolver::new(&binds, &factory);
        let resolved = tree.accept(&mut resolver).unwrap();
        assert_eq!(resolved.to_string(), "(a = 7 OR b = 7)");
        assert_eq!(resolver.placeholders(), 1);
    }
}

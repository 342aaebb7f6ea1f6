//! Canonical orientation of comparisons: the constant operand goes on the right.

use crate::expression::CompileResult;
use crate::parse::factory::ParseNodeFactory;
use crate::parse::node::{ComparisonNode, ParseNode};
use crate::parse::visitor::ParseNodeVisitor;

impl ComparisonNode {
    /// Swap the operands and invert the operator when the constant is on the left.
    ///
    /// Returns `self` unchanged when `rhs` is already constant or `lhs` is not,
    /// so applying it twice gives the same node as applying it once.
    pub fn normalize(self, factory: &ParseNodeFactory) -> ComparisonNode {
        if self.rhs().is_constant() || !self.lhs().is_constant() {
            return self;
        }
        let op = self.op().invert();
        let (lhs, rhs) = self.into_operands();
        factory.comparison_node(op, rhs, lhs)
    }

    /// Whether the node is already in canonical orientation
    pub fn is_canonical(&self) -> bool {
        self.rhs().is_constant() || !self.lhs().is_constant()
    }
}

/// Rebuilds a tree with every comparison in canonical orientation
pub struct Normalizer<'a> {
    factory: &'a ParseNodeFactory,
    rewritten: usize,
}

impl<'a> Normalizer<'a> {
    pub fn new(factory: &'a ParseNodeFactory) -> Self {
        Self {
            factory,
            rewritten: 0,
        }
    }

    /// Number of comparisons whose operands were swapped
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }
}

impl ParseNodeVisitor for Normalizer<'_> {
    type Output = ParseNode;

    fn visit_leave(
        &mut self,
        node: &ParseNode,
        children: Vec<ParseNode>,
    ) -> CompileResult<ParseNode> {
        match node.rebuild(children)? {
            ParseNode::Comparison(cmp) => {
                if !cmp.is_canonical() {
                    self.rewritten += 1;
                }
                Ok(ParseNode::Comparison(cmp.normalize(self.factory)))
            }
            other => Ok(other),
        }
    }
}

/// Normalize every comparison in `node`
pub fn normalize_tree(node: &ParseNode, factory: &ParseNodeFactory) -> CompileResult<ParseNode> {
    let mut normalizer = Normalizer::new(factory);
    let normalized = node.accept(&mut normalizer)?;
    log::debug!(
        "normalized {} comparison(s) in {}",
        normalizer.rewritten(),
        node
    );
    Ok(normalized)
}

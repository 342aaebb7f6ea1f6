//! Enter/leave traversal over parse trees.
//!
//! `accept` calls `visit_enter` before descending into a node. When it returns
//! `true` the children are visited left to right and their results collected;
//! when it returns `false` the children are skipped and `visit_leave` receives
//! an empty result list. `visit_leave` combines the child results into the
//! node's own result. Any error aborts the traversal immediately.

use crate::expression::CompileResult;
use crate::parse::node::ParseNode;

/// Visitor driven by [`ParseNode::accept`]
pub trait ParseNodeVisitor {
    type Output;

    /// Called before the children of `node`; return `false` to skip them
    fn visit_enter(&mut self, _node: &ParseNode) -> CompileResult<bool> {
        Ok(true)
    }

    /// Called after the children of `node` with their results, in order
    fn visit_leave(
        &mut self,
        node: &ParseNode,
        children: Vec<Self::Output>,
    ) -> CompileResult<Self::Output>;
}

impl ParseNode {
    /// Drive `visitor` over this node and its subtree
    pub fn accept<V>(&self, visitor: &mut V) -> CompileResult<V::Output>
    where
        V: ParseNodeVisitor + ?Sized,
    {
        let mut results = Vec::new();
        if visitor.visit_enter(self)? {
            for child in self.children() {
                results.push(child.accept(visitor)?);
            }
        }
        visitor.visit_leave(self, results)
    }
}

//! Compile-time evaluation of function calls.

use crate::access::Value;
use crate::expression::function::{FunctionContext, ScalarFunction};
use crate::expression::CompileResult;
use crate::parse::{LiteralNode, ParseNode, ParseNodeVisitor};

/// Type-checks every function call and folds the ones whose arguments are all
/// literals into a literal. Calls over column references stay in the tree and
/// are evaluated per row.
pub struct FunctionCompiler<'a> {
    context: &'a FunctionContext,
    fold_constants: bool,
    folded: usize,
    deferred: usize,
}

impl<'a> FunctionCompiler<'a> {
    pub fn new(context: &'a FunctionContext) -> Self {
        Self {
            context,
            fold_constants: true,
            folded: 0,
            deferred: 0,
        }
    }

    /// Keep constant calls in the tree instead of folding them
    pub fn without_folding(mut self) -> Self {
        self.fold_constants = false;
        self
    }

    pub fn folded(&self) -> usize {
        self.folded
    }

    pub fn deferred(&self) -> usize {
        self.deferred
    }
}

impl ParseNodeVisitor for FunctionCompiler<'_> {
    type Output = ParseNode;

    fn visit_leave(
        &mut self,
        node: &ParseNode,
        children: Vec<ParseNode>,
    ) -> CompileResult<ParseNode> {
        let func = match node.rebuild(children)? {
            ParseNode::Function(func) => func,
            other => return Ok(other),
        };

        let function = ScalarFunction::resolve(&func.name)?;
        function.check_arity(func.args.len())?;
        for (position, arg) in func.args.iter().enumerate() {
            if let Some(value) = arg.as_literal() {
                function.check_argument(position, value)?;
            }
        }

        let constant_args: Option<Vec<Value>> =
            func.args.iter().map(|arg| arg.as_literal().cloned()).collect();
        match constant_args {
            Some(values) if self.fold_constants => {
                let value = function.evaluate(&values, self.context)?;
                log::debug!("folded {} into {}", ParseNode::Function(func), value);
                self.folded += 1;
                Ok(ParseNode::Literal(LiteralNode { value }))
            }
            _ => {
                self.deferred += 1;
                Ok(ParseNode::Function(func))
            }
        }
    }
}

/// Compile every function call in `node`
pub fn compile_functions(node: &ParseNode, context: &FunctionContext) -> CompileResult<ParseNode> {
    node.accept(&mut FunctionCompiler::new(context))
}

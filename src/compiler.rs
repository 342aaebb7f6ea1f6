//! Predicate compilation pipeline.
//!
//! A predicate goes through four passes, each producing a new tree:
//! 1. bind parameters are replaced by typed literals
//! 2. function calls are type-checked and folded when constant
//! 3. comparisons are normalized so the constant sits on the right
//! 4. the result is split into a storage filter and a residual predicate

use crate::access::Value;
use crate::config::CompilerConfig;
use crate::expression::{
    resolve_binds, CompileError, CompileResult, FunctionCompiler, FunctionContext,
};
use crate::filter::PushdownPlan;
use crate::parse::{normalize_tree, ParseNode, ParseNodeFactory};
use crate::sql::{parse_predicate, parse_select, SelectStatement};

/// A predicate ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    /// Normalized predicate with binds resolved and constants folded
    pub predicate: ParseNode,
    pub pushdown: PushdownPlan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSelect {
    pub statement: SelectStatement,
    /// `None` when the statement has no WHERE clause
    pub filter: Option<CompiledPredicate>,
}

/// Compiler for SQL predicates
#[derive(Debug, Clone, Default)]
pub struct ExpressionCompiler {
    config: CompilerConfig,
    context: FunctionContext,
}

impl ExpressionCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        let context = config.function_context();
        Self { config, context }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a parsed predicate against positional bind values
    pub fn compile(&self, node: &ParseNode, binds: &[Value]) -> CompileResult<CompiledPredicate> {
        let factory = ParseNodeFactory::new();

        let resolved = resolve_binds(node, binds, &factory)?;
        log::debug!("resolved binds: {}", resolved);

        let mut compiler = FunctionCompiler::new(&self.context);
        if !self.config.functions.fold_constants {
            compiler = compiler.without_folding();
        }
        let compiled = resolved.accept(&mut compiler)?;
        log::debug!(
            "compiled functions ({} folded, {} deferred): {}",
            compiler.folded(),
            compiler.deferred(),
            compiled
        );

        let predicate = normalize_tree(&compiled, &factory)?;
        let pushdown = self.config.filter_builder().build(&predicate);

        Ok(CompiledPredicate {
            predicate,
            pushdown,
        })
    }

    /// Parse and compile a standalone predicate
    pub fn compile_sql(&self, sql: &str, binds: &[Value]) -> CompileResult<CompiledPredicate> {
        let node = parse_predicate(sql).map_err(syntax_error)?;
        self.compile(&node, binds)
    }

    /// Parse a SELECT statement and compile its WHERE clause
    pub fn compile_select(&self, sql: &str, binds: &[Value]) -> CompileResult<CompiledSelect> {
        let statement = parse_select(sql).map_err(syntax_error)?;
        let filter = statement
            .where_clause
            .as_ref()
            .map(|predicate| self.compile(predicate, binds))
            .transpose()?;
        Ok(CompiledSelect { statement, filter })
    }
}

fn syntax_error(err: anyhow::Error) -> CompileError {
    CompileError::Syntax {
        message: format!("{:#}", err),
    }
}

// Statement-level syntax produced by the parser

use crate::parse::{ColumnRefNode, ParseNode};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projections: Vec<SelectItem>,
    pub table: String,
    pub where_clause: Option<ParseNode>,
    /// Number of `?` placeholders in the statement
    pub bind_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    AllColumns,
    Column(ColumnRefNode),
}

// SQL module - predicate grammar producing parse nodes

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse_predicate, parse_select, Parser};
pub use token::*;

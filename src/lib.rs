pub mod access;
pub mod compiler;
pub mod config;
pub mod expression;
pub mod filter;
pub mod parse;
pub mod sql;

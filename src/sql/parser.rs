// SQL parser - converts tokens to parse nodes

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::access::Value;
use crate::parse::{ColumnRefNode, CompareOp, ParseNode, ParseNodeFactory};
use anyhow::{bail, Result};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    factory: ParseNodeFactory,
}

impl Parser {
    pub fn new(sql: &str) -> Self {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize();
        Parser {
            tokens,
            position: 0,
            factory: ParseNodeFactory::new(),
        }
    }

    /// Number of `?` placeholders seen so far
    pub fn bind_count(&self) -> usize {
        self.factory.bind_count()
    }

    /// Parse a standalone predicate such as `a_date < TO_DATE(?)`
    pub fn parse_predicate(&mut self) -> Result<ParseNode> {
        let predicate = self.parse_expression()?;
        self.expect_end()?;
        Ok(predicate)
    }

    /// Parse `SELECT cols FROM table [WHERE predicate]`
    pub fn parse_select(&mut self) -> Result<SelectStatement> {
        self.expect_token(Token::Select)?;
        let projections = self.parse_select_items()?;

        self.expect_token(Token::From)?;
        let table = self.expect_identifier()?;

        let where_clause = if self.match_token(&Token::Where) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_end()?;

        Ok(SelectStatement {
            projections,
            table,
            where_clause,
            bind_count: self.bind_count(),
        })
    }

    /// Parse SELECT items
    fn parse_select_items(&mut self) -> Result<Vec<SelectItem>> {
        if self.match_token(&Token::Star) {
            self.advance();
            return Ok(vec![SelectItem::AllColumns]);
        }

        let mut items = vec![];
        loop {
            let name = self.expect_identifier()?;
            let column = if self.match_token(&Token::Dot) {
                self.advance();
                ColumnRefNode {
                    table: Some(name),
                    name: self.expect_identifier()?,
                }
            } else {
                ColumnRefNode { table: None, name }
            };
            items.push(SelectItem::Column(column));

            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    fn parse_expression(&mut self) -> Result<ParseNode> {
        self.parse_or()
    }

    /// Parse OR expression
    fn parse_or(&mut self) -> Result<ParseNode> {
        let mut terms = vec![self.parse_and()?];

        while self.match_token(&Token::Or) {
            self.advance();
            terms.push(self.parse_and()?);
        }

        Ok(self.factory.or(terms))
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> Result<ParseNode> {
        let mut terms = vec![self.parse_not()?];

        while self.match_token(&Token::And) {
            self.advance();
            terms.push(self.parse_not()?);
        }

        Ok(self.factory.and(terms))
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> Result<ParseNode> {
        if self.match_token(&Token::Not) {
            self.advance();
            let operand = self.parse_not()?;
            Ok(self.factory.not(operand))
        } else {
            self.parse_comparison()
        }
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> Result<ParseNode> {
        let left = self.parse_unary()?;

        let op = match self.current_token() {
            Token::Equal => CompareOp::Equal,
            Token::NotEqual => CompareOp::NotEqual,
            Token::Less => CompareOp::Less,
            Token::LessEqual => CompareOp::LessOrEqual,
            Token::Greater => CompareOp::Greater,
            Token::GreaterEqual => CompareOp::GreaterOrEqual,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_unary()?;
        Ok(self.factory.comparison(op, left, right))
    }

    /// Parse a signed numeric literal or a primary expression
    fn parse_unary(&mut self) -> Result<ParseNode> {
        if !self.match_token(&Token::Minus) {
            return self.parse_primary();
        }
        self.advance();
        match self.current_token() {
            Token::Number(n) => {
                self.advance();
                Ok(self.factory.literal(parse_number(&format!("-{}", n))?))
            }
            other => bail!("Expected number after '-', found {:?}", other),
        }
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<ParseNode> {
        match self.current_token() {
            Token::Number(n) => {
                self.advance();
                Ok(self.factory.literal(parse_number(&n)?))
            }
            Token::String(s) => {
                self.advance();
                Ok(self.factory.string(s))
            }
            Token::True => {
                self.advance();
                Ok(self.factory.literal(Value::Boolean(true)))
            }
            Token::False => {
                self.advance();
                Ok(self.factory.literal(Value::Boolean(false)))
            }
            Token::Null => {
                self.advance();
                Ok(self.factory.null())
            }
            Token::Question => {
                self.advance();
                Ok(self.factory.bind())
            }
            Token::Identifier(name) => {
                self.advance();

                // Check for qualified column (table.column)
                if self.match_token(&Token::Dot) {
                    self.advance();
                    let column = self.expect_identifier()?;
                    Ok(self.factory.qualified_column(name, column))
                }
                // Check for function call
                else if self.match_token(&Token::LeftParen) {
                    self.advance();
                    let args = if self.match_token(&Token::RightParen) {
                        vec![]
                    } else {
                        self.parse_expression_list()?
                    };
                    self.expect_token(Token::RightParen)?;
                    Ok(self.factory.function(name, args))
                } else {
                    Ok(self.factory.column(name))
                }
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(Token::RightParen)?;
                Ok(expr)
            }
            Token::Invalid(text) => bail!("Invalid token: {}", text),
            other => bail!("Unexpected token: {:?}", other),
        }
    }

    fn parse_expression_list(&mut self) -> Result<Vec<ParseNode>> {
        let mut expressions = vec![self.parse_expression()?];

        while self.match_token(&Token::Comma) {
            self.advance();
            expressions.push(self.parse_expression()?);
        }

        Ok(expressions)
    }

    // Helper methods

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.current_token() == *token
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> Result<()> {
        if self.current_token() == token {
            self.advance();
            Ok(())
        } else {
            bail!("Expected {:?}, found {:?}", token, self.current_token())
        }
    }

    /// Expect an identifier
    fn expect_identifier(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => bail!("Expected identifier, found {:?}", other),
        }
    }

    /// Accept an optional trailing semicolon, then require end of input
    fn expect_end(&mut self) -> Result<()> {
        if self.match_token(&Token::Semicolon) {
            self.advance();
        }
        match self.current_token() {
            Token::Eof => Ok(()),
            other => bail!("Unexpected trailing token: {:?}", other),
        }
    }
}

/// Integers become BIGINT, anything with a fraction DOUBLE
fn parse_number(text: &str) -> Result<Value> {
    if let Ok(i) = text.parse::<i64>() {
        Ok(Value::Int64(i))
    } else if let Ok(f) = text.parse::<f64>() {
        Ok(Value::Double(f))
    } else {
        bail!("Invalid number: {}", text)
    }
}

/// Parse a standalone predicate
pub fn parse_predicate(sql: &str) -> Result<ParseNode> {
    Parser::new(sql).parse_predicate()
}

/// Parse a SELECT statement
pub fn parse_select(sql: &str) -> Result<SelectStatement> {
    Parser::new(sql).parse_select()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::BindParameterNode;

    #[test]
    fn test_parse_comparison_with_function() {
        let predicate = parse_predicate("a_date < TO_DATE('1970-1-1 12:00:00')").unwrap();
        assert_eq!(
            predicate.to_string(),
            "a_date < TO_DATE('1970-1-1 12:00:00')"
        );
    }

    #[test]
    fn test_placeholders_are_numbered_in_order() {
        let mut parser = Parser::new("a = ? AND b < to_date(?)");
        let predicate = parser.parse_predicate().unwrap();
        assert_eq!(parser.bind_count(), 2);
        assert_eq!(predicate.to_string(), "(a = :1 AND b < TO_DATE(:2))");

        match &predicate {
            ParseNode::And(terms) => match &terms[1] {
                ParseNode::Comparison(cmp) => match cmp.rhs() {
                    ParseNode::Function(func) => assert_eq!(
                        func.args[0],
                        ParseNode::BindParameter(BindParameterNode { index: 1 })
                    ),
                    other => panic!("Expected function, got {:?}", other),
                },
                other => panic!("Expected comparison, got {:?}", other),
            },
            other => panic!("Expected AND, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let predicate = parse_predicate("a = 1 OR b = 2 AND NOT c = 3").unwrap();
        assert_eq!(predicate.to_string(), "(a = 1 OR (b = 2 AND NOT c = 3))");

        let predicate = parse_predicate("(a = 1 OR b = 2) AND c = 3").unwrap();
        assert_eq!(predicate.to_string(), "((a = 1 OR b = 2) AND c = 3)");
    }

    #[test]
    fn test_literals() {
        let predicate = parse_predicate("-5 <= x AND y = 2.5 AND z != NULL AND t = TRUE").unwrap();
        assert_eq!(
            predicate.to_string(),
            "(-5 <= x AND y = 2.5 AND z != NULL AND t = TRUE)"
        );
    }

    #[test]
    fn test_parse_select() {
        let stmt = parse_select(
            "SELECT a_integer, atable.x_integer FROM atable \
             WHERE a_date >= TO_DATE('1970-1-2 23:59:59') and a_date <= TO_DATE('1970-1-3 0:0:1');",
        )
        .unwrap();

        assert_eq!(stmt.table, "atable");
        assert_eq!(
            stmt.projections,
            vec![
                SelectItem::Column(ColumnRefNode {
                    table: None,
                    name: "a_integer".to_string()
                }),
                SelectItem::Column(ColumnRefNode {
                    table: Some("atable".to_string()),
                    name: "x_integer".to_string()
                }),
            ]
        );
        assert!(matches!(stmt.where_clause, Some(ParseNode::And(_))));
        assert_eq!(stmt.bind_count, 0);

        let stmt = parse_select("SELECT * FROM atable").unwrap();
        assert_eq!(stmt.projections, vec![SelectItem::AllColumns]);
        assert_eq!(stmt.where_clause, None);
    }

    #[test]
    fn test_syntax_errors() {
        for sql in [
            "a <",
            "a = 1 extra",
            "TO_DATE('x'",
            "a = 'open",
            "a = - b",
            "a # 1",
        ] {
            assert!(parse_predicate(sql).is_err(), "{} should not parse", sql);
        }
        assert!(parse_select("SELECT FROM atable").is_err());
        assert!(parse_select("SELECT a atable").is_err());
    }
}

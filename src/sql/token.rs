// SQL tokens for lexical analysis

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Identifier(String),
    Number(String),
    String(String),

    // Keywords
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    Null,
    True,
    False,

    // Operators
    Minus,
    Star,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,

    /// `?` placeholder
    Question,

    // Special
    Invalid(String),
    Eof,
}

impl Token {
    /// Check if the token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Select
                | Token::From
                | Token::Where
                | Token::And
                | Token::Or
                | Token::Not
                | Token::Null
                | Token::True
                | Token::False
        )
    }

    /// Convert a string to a keyword token if it matches
    pub fn keyword_from_str(s: &str) -> Option<Token> {
        match s.to_uppercase().as_str() {
            "SELECT" => Some(Token::Select),
            "FROM" => Some(Token::From),
            "WHERE" => Some(Token::Where),
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "NOT" => Some(Token::Not),
            "NULL" => Some(Token::Null),
            "TRUE" => Some(Token::True),
            "FALSE" => Some(Token::False),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert!(Token::Select.is_keyword());
        assert!(Token::And.is_keyword());
        assert!(!Token::Identifier("a_date".to_string()).is_keyword());
        assert!(!Token::Question.is_keyword());
    }

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Token::keyword_from_str("WHERE"), Some(Token::Where));
        assert_eq!(Token::keyword_from_str("and"), Some(Token::And));
        assert_eq!(Token::keyword_from_str("to_date"), None);
    }
}

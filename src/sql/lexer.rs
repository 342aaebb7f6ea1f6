// SQL lexer - tokenizes predicates and simple SELECT statements

use super::token::Token;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let current_char = input.first().copied();
        Lexer {
            input,
            position: 0,
            current_char,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(ch) = self.current_char else {
            return Token::Eof;
        };

        match ch {
            '-' => {
                self.advance();
                if self.current_char == Some('-') {
                    self.skip_comment();
                    return self.next_token();
                }
                Token::Minus
            }
            '*' => {
                self.advance();
                Token::Star
            }
            '=' => {
                self.advance();
                Token::Equal
            }
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::LessEqual
                } else if self.current_char == Some('>') {
                    self.advance();
                    Token::NotEqual
                } else {
                    Token::Less
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::GreaterEqual
                } else {
                    Token::Greater
                }
            }
            '!' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::NotEqual
                } else {
                    Token::Invalid("!".to_string())
                }
            }
            '?' => {
                self.advance();
                Token::Question
            }
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            '.' => {
                self.advance();
                Token::Dot
            }
            '\'' => self.read_string(),
            '"' => self.read_quoted_identifier(),
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            c if c.is_ascii_digit() => self.read_number(),
            other => {
                self.advance();
                Token::Invalid(other.to_string())
            }
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip single-line comments starting with --
    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::keyword_from_str(&identifier).unwrap_or(Token::Identifier(identifier))
    }

    /// Read a quoted identifier (e.g., "A_DATE")
    fn read_quoted_identifier(&mut self) -> Token {
        self.advance(); // Skip opening quote
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch == '"' {
                if self.peek() == Some('"') {
                    identifier.push('"');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // Skip closing quote
                    return Token::Identifier(identifier);
                }
            } else {
                identifier.push(ch);
                self.advance();
            }
        }

        Token::Invalid(format!("unterminated identifier \"{}", identifier))
    }

    /// Read a string literal
    fn read_string(&mut self) -> Token {
        self.advance(); // Skip opening quote
        let mut string = String::new();

        while let Some(ch) = self.current_char {
            if ch == '\'' {
                if self.peek() == Some('\'') {
                    // Handle escaped single quotes
                    string.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // Skip closing quote
                    return Token::String(string);
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Token::Invalid(format!("unterminated string '{}", string))
    }

    /// Read a number (integer or decimal)
    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut has_dot = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot && self.peek().map_or(false, |c| c.is_ascii_digit()) {
                has_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::Number(number)
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("= < > <= >= <> != ?");
        assert_eq!(lexer.next_token(), Token::Equal);
        assert_eq!(lexer.next_token(), Token::Less);
        assert_eq!(lexer.next_token(), Token::Greater);
        assert_eq!(lexer.next_token(), Token::LessEqual);
        assert_eq!(lexer.next_token(), Token::GreaterEqual);
        assert_eq!(lexer.next_token(), Token::NotEqual);
        assert_eq!(lexer.next_token(), Token::NotEqual);
        assert_eq!(lexer.next_token(), Token::Question);
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn test_string_literals() {
        let mut lexer = Lexer::new("'1970-1-1 12:00:00' 'it''s fine' 'é'");
        assert_eq!(
            lexer.next_token(),
            Token::String("1970-1-1 12:00:00".to_string())
        );
        assert_eq!(lexer.next_token(), Token::String("it's fine".to_string()));
        assert_eq!(lexer.next_token(), Token::String("é".to_string()));

        let mut lexer = Lexer::new("'open");
        assert!(matches!(lexer.next_token(), Token::Invalid(_)));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("123 456.789 7.");
        assert_eq!(lexer.next_token(), Token::Number("123".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("456.789".to_string()));
        assert_eq!(lexer.next_token(), Token::Number("7".to_string()));
        assert_eq!(lexer.next_token(), Token::Dot);
    }

    #[test]
    fn test_quoted_identifiers() {
        let mut lexer = Lexer::new(r#""A_DATE" "x""y""#);
        assert_eq!(lexer.next_token(), Token::Identifier("A_DATE".to_string()));
        assert_eq!(lexer.next_token(), Token::Identifier("x\"y".to_string()));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("a -- comment\n= 1");
        assert_eq!(lexer.next_token(), Token::Identifier("a".to_string()));
        assert_eq!(lexer.next_token(), Token::Equal);
        assert_eq!(lexer.next_token(), Token::Number("1".to_string()));
    }

    #[test]
    fn test_full_query() {
        let mut lexer =
            Lexer::new("SELECT a_integer FROM atable WHERE a_date < TO_DATE(?) AND x != 'y'");
        let tokens = lexer.tokenize();

        assert_eq!(
            tokens,
            vec![
                Token::Select,
                Token::Identifier("a_integer".to_string()),
                Token::From,
                Token::Identifier("atable".to_string()),
                Token::Where,
                Token::Identifier("a_date".to_string()),
                Token::Less,
                Token::Identifier("TO_DATE".to_string()),
                Token::LeftParen,
                Token::Question,
                Token::RightParen,
                Token::And,
                Token::Identifier("x".to_string()),
                Token::NotEqual,
                Token::String("y".to_string()),
                Token::Eof,
            ]
        );
    }
}

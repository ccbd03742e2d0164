use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),  // command, argument or quoted span
    Pipe,          // |
    RedirectIn,    // <
    RedirectOut,   // >
    Semicolon,     // ;
    LParen,        // (
    RParen,        // )
}

impl Token {
    /// Maps one of the special characters `( ) > < ; |` to its operator token.
    pub fn operator(ch: char) -> Option<Token> {
        match ch {
            '|' => Some(Token::Pipe),
            '<' => Some(Token::RedirectIn),
            '>' => Some(Token::RedirectOut),
            ';' => Some(Token::Semicolon),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        }
    }

    pub fn is_operator_char(ch: char) -> bool {
        Token::operator(ch).is_some()
    }

    pub fn is_operator(&self) -> bool {
        !matches!(self, Token::Word(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(word) => word,
            Token::Pipe => "|",
            Token::RedirectIn => "<",
            Token::RedirectOut => ">",
            Token::Semicolon => ";",
            Token::LParen => "(",
            Token::RParen => ")",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Token {
    fn from(word: &str) -> Self {
        Token::Word(word.to_string())
    }
}

mod token;

pub use token::Token;

pub struct Lexer;

impl Lexer {
    /// Splits one input line into words and single-character operators.
    ///
    /// A `"` starts a quoted span that runs to the next `"` or to the end of
    /// the line; everything inside it, spaces and operator characters
    /// included, becomes one word. Outside quotes a word ends at a space or
    /// an operator character. Only the ASCII space separates words.
    pub fn tokenize(line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chars = line.chars().peekable();

        while let Some(&ch) = chars.peek() {
            match ch {
                '"' => {
                    chars.next();
                    let mut buf = String::new();
                    // an unterminated quote runs to the end of the line
                    for nc in chars.by_ref() {
                        if nc == '"' {
                            break;
                        }
                        buf.push(nc);
                    }
                    tokens.push(Token::Word(buf));
                }
                ' ' => {
                    chars.next();
                }
                _ => {
                    if let Some(op) = Token::operator(ch) {
                        chars.next();
                        tokens.push(op);
                        continue;
                    }
                    let mut buf = String::new();
                    while let Some(&nc) = chars.peek() {
                        if nc == ' ' || Token::is_operator_char(nc) {
                            break;
                        }
                        buf.push(nc);
                        chars.next();
                    }
                    tokens.push(Token::Word(buf));
                }
            }
        }

        tokens
    }
}

pub fn tokenize(line: &str) -> Vec<Token> {
    Lexer::tokenize(line)
}

/// Renders tokens back into one line, separated by single spaces.
pub fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(line: &str) -> Vec<String> {
        tokenize(line).iter().map(|t| t.as_str().to_string()).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(texts("cd foo"), vec!["cd", "foo"]);
        assert_eq!(
            tokenize("cd foo"),
            vec![Token::from("cd"), Token::from("foo")]
        );
    }

    #[test]
    fn test_quoted_span_is_one_word() {
        assert_eq!(texts(r#"echo "a b" c"#), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn test_operator_without_spaces() {
        assert_eq!(
            tokenize("ls<file.txt"),
            vec![Token::from("ls"), Token::RedirectIn, Token::from("file.txt")]
        );
    }

    #[test]
    fn test_separators() {
        assert_eq!(
            tokenize("a;b|c"),
            vec![
                Token::from("a"),
                Token::Semicolon,
                Token::from("b"),
                Token::Pipe,
                Token::from("c"),
            ]
        );
    }

    #[test]
    fn test_every_operator_character() {
        assert_eq!(
            tokenize("()><;|"),
            vec![
                Token::LParen,
                Token::RParen,
                Token::RedirectOut,
                Token::RedirectIn,
                Token::Semicolon,
                Token::Pipe,
            ]
        );
    }

    #[test]
    fn test_operators_inside_quotes_are_words() {
        let tokens = tokenize(r#"echo "a;b|c" ";""#);
        assert_eq!(
            tokens,
            vec![Token::from("echo"), Token::from("a;b|c"), Token::from(";")]
        );
        assert!(tokens.iter().all(|t| !t.is_operator()));
    }

    #[test]
    fn test_empty_quotes_yield_empty_word() {
        assert_eq!(texts(r#"echo """#), vec!["echo", ""]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(texts(r#"echo "a b ; c"#), vec!["echo", "a b ; c"]);
        assert_eq!(texts("\""), vec![""]);
    }

    #[test]
    fn test_quote_inside_word_is_literal() {
        assert_eq!(texts(r#"a"b c""#), vec![r#"a"b"#, r#"c""#]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("     ").is_empty());
    }

    #[test]
    fn test_tab_is_a_word_character() {
        assert_eq!(texts("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_join_uses_single_spaces() {
        assert_eq!(join(&tokenize("ls   -l>out ;pwd")), "ls -l > out ; pwd");
    }

    proptest! {
        #[test]
        fn prop_rejoin_preserves_unquoted_tokens(line in "[ab ;|<>()]{0,40}") {
            let tokens = tokenize(&line);
            prop_assert_eq!(tokenize(&join(&tokens)), tokens);
        }

        #[test]
        fn prop_rejoin_preserves_count_and_operators(line in "[ab \";|<>]{0,40}") {
            let tokens = tokenize(&line);
            let rejoined = tokenize(&join(&tokens));
            let ops = |ts: &Vec<Token>| ts.iter().filter(|t| t.is_operator()).count();
            if !line.contains('"') {
                prop_assert_eq!(rejoined.len(), tokens.len());
            }
            prop_assert!(ops(&rejoined) >= ops(&tokens));
        }
    }
}

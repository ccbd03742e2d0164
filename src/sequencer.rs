use crate::lexer::Token;

/// One unit of work cut out of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A single command group, possibly empty.
    Command(Vec<Token>),
    /// Left and right command groups joined by the first `|` of the line.
    Pipe(Vec<Token>, Vec<Token>),
}

impl Dispatch {
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        let (lhs, rhs) = match self {
            Dispatch::Command(group) => (group.as_slice(), &[][..]),
            Dispatch::Pipe(lhs, rhs) => (lhs.as_slice(), rhs.as_slice()),
        };
        lhs.iter().chain(rhs)
    }
}

/// Splits a token sequence into dispatch actions.
///
/// Every `;` closes the group accumulated so far. The first `|` closes the
/// left-hand group and takes the rest of the line, separators included, as
/// its right-hand group; nothing after it is split again. Whatever remains
/// at the end forms a final, possibly empty, command group.
pub fn sequence(tokens: Vec<Token>) -> Vec<Dispatch> {
    let mut actions = Vec::new();
    let mut group = Vec::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Semicolon => actions.push(Dispatch::Command(std::mem::take(&mut group))),
            Token::Pipe => {
                actions.push(Dispatch::Pipe(group, iter.collect()));
                return actions;
            }
            other => group.push(other),
        }
    }

    actions.push(Dispatch::Command(group));
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use proptest::prelude::*;

    fn cmd(line: &str) -> Dispatch {
        Dispatch::Command(tokenize(line))
    }

    #[test]
    fn test_single_command() {
        assert_eq!(sequence(tokenize("ls -l")), vec![cmd("ls -l")]);
    }

    #[test]
    fn test_statement_separators() {
        assert_eq!(
            sequence(tokenize("false ; echo after;pwd")),
            vec![cmd("false"), cmd("echo after"), cmd("pwd")]
        );
    }

    #[test]
    fn test_trailing_separator_leaves_empty_group() {
        assert_eq!(sequence(tokenize("ls;")), vec![cmd("ls"), cmd("")]);
        assert_eq!(sequence(Vec::new()), vec![cmd("")]);
    }

    #[test]
    fn test_pipe_takes_rest_of_line() {
        assert_eq!(
            sequence(tokenize("a ; b | c ; d | e")),
            vec![
                cmd("a"),
                Dispatch::Pipe(tokenize("b"), tokenize("c ; d | e")),
            ]
        );
    }

    #[test]
    fn test_redirections_stay_in_group() {
        assert_eq!(
            sequence(tokenize("cat < in > out ; ls")),
            vec![cmd("cat < in > out"), cmd("ls")]
        );
    }

    #[test]
    fn test_tokens_visits_both_sides() {
        let action = Dispatch::Pipe(tokenize("echo hi"), tokenize("cat"));
        let words: Vec<&str> = action.tokens().map(Token::as_str).collect();
        assert_eq!(words, vec!["echo", "hi", "cat"]);
    }

    proptest! {
        #[test]
        fn prop_without_pipe_splits_on_semicolons(line in "[ab ;<>()]{0,40}") {
            let tokens = tokenize(&line);
            let expected: Vec<Dispatch> = tokens
                .split(|t| *t == Token::Semicolon)
                .map(|group| Dispatch::Command(group.to_vec()))
                .collect();
            let actions = sequence(tokens);
            prop_assert!(actions.iter().all(|a| a.tokens().all(|t| *t != Token::Semicolon)));
            prop_assert_eq!(actions, expected);
        }

        #[test]
        fn prop_nothing_after_first_pipe_is_split(line in "[ab ;|]{0,40}") {
            let tokens = tokenize(&line);
            let actions = sequence(tokens.clone());
            let consumed = match tokens.iter().position(|t| *t == Token::Pipe) {
                Some(at) => {
                    let before = tokens[..at].iter().filter(|t| **t == Token::Semicolon).count();
                    prop_assert_eq!(actions.len(), before + 1);
                    match actions.last() {
                        Some(Dispatch::Pipe(_, rhs)) => prop_assert_eq!(rhs.as_slice(), &tokens[at + 1..]),
                        other => prop_assert!(false, "expected a pipe action, got {:?}", other),
                    }
                    before + 1
                }
                None => {
                    prop_assert!(actions.iter().all(|a| matches!(a, Dispatch::Command(_))));
                    tokens.iter().filter(|t| **t == Token::Semicolon).count()
                }
            };
            // every token lands in exactly one action, separators in none
            let kept: usize = actions.iter().map(|a| a.tokens().count()).sum();
            prop_assert_eq!(kept + consumed, tokens.len());
        }
    }
}

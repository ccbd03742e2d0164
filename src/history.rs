use crate::lexer::Token;

/// The token sequence of the line read before the current one.
#[derive(Debug, Default, Clone)]
pub struct History {
    last: Option<Vec<Token>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    // Replace the stored line; called once per read loop iteration
    pub fn record(&mut self, tokens: Vec<Token>) {
        self.last = Some(tokens);
    }

    // Get the stored line, if it had any tokens
    pub fn last(&self) -> Option<&[Token]> {
        self.last.as_deref().filter(|tokens| !tokens.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.last().is_none()
    }
}

use error::ParserError;
use generational_arena::{Arena, Index};
use node::{Node, NodeKind};

use super::{
    Interner,
    tokens::{Keyword, Punctuation, Span, Token, TokenKind},
};

mod assignment;
mod binary_ops;
mod block;
mod control_flow;
mod definitions;
pub mod display;
pub mod error;
mod expr;
mod identifier;
mod literal;
pub mod node;
mod paren_block;
mod precedence;
mod statements;
mod unary_ops;

pub struct Parser<'a> {
    pub tree: Arena<Node>,
    pub parse_errors: Vec<ParserError>,
    interner: &'a Interner,
    tokens: Vec<Token>,
    current_idx: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with `Eof`, which `Lexer::tokenize` guarantees.
    pub fn new(tokens: Vec<Token>, interner: &'a Interner) -> Self {
        Self {
            tree: Arena::new(),
            parse_errors: Vec::new(),
            interner,
            tokens,
            current_idx: 0,
        }
    }

    /// Parses every definition, recovering at the next `fn` or marker after an error.
    pub fn parse(&mut self) -> Node {
        let mut span = self.current().span;
        let mut defs = Vec::new();

        while self.current().kind != TokenKind::Eof {
            match self.parse_def() {
                Ok(idx) => defs.push(idx),
                Err(e) => {
                    self.parse_errors.push(e);
                    self.synchronize();
                }
            }
        }

        if let Some(last_node) = defs.last().and_then(|idx| self.node(idx)) {
            span.connect_mut(&last_node.span);
        }

        Node::new(NodeKind::Root { defs }, span)
    }

    fn synchronize(&mut self) {
        self.advance();
        while !matches!(
            self.current().kind,
            TokenKind::Eof | TokenKind::Keyword(Keyword::Fn) | TokenKind::Punctuation(Punctuation::Hash)
        ) {
            self.advance();
        }
    }

    /// Moves to the next token; stays on `Eof` once reached.
    pub fn advance(&mut self) {
        if self.current_idx + 1 < self.tokens.len() {
            self.current_idx += 1;
        }
    }

    /// looks at current token
    pub fn current(&self) -> &Token {
        &self.tokens[self.current_idx.min(self.tokens.len().saturating_sub(1))]
    }

    pub fn node(&self, idx: &Index) -> Option<&Node> {
        self.tree.get(*idx)
    }

    pub fn push(&mut self, node: Node) -> Index {
        self.tree.insert(node)
    }

    pub fn is_punct(&self, punct: Punctuation) -> bool {
        self.current().kind == TokenKind::Punctuation(punct)
    }

    pub fn expected(&self, what: &str) -> ParserError {
        ParserError::Expected {
            what: what.to_string(),
            got: format!("{:?}", self.current().kind),
            span: self.current().span.to_display(self.interner),
        }
    }

    /// Consumes `punct` or reports what was found instead.
    pub fn expect_punct(&mut self, punct: Punctuation, what: &str) -> Result<Token, ParserError> {
        let token = *self.current();
        if token.kind == TokenKind::Punctuation(punct) {
            self.advance();
            Ok(token)
        } else {
            Err(self.expected(what))
        }
    }

    pub fn node_span(&self, idx: Index, what: &str) -> Result<Span, ParserError> {
        self.node(&idx).map(|n| n.span).ok_or_else(|| ParserError::NotFound {
            what: what.to_string(),
            span: self.current().span.to_display(self.interner),
        })
    }
}

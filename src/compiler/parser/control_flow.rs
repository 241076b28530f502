use generational_arena::Index;

use crate::compiler::tokens::{Keyword, TokenKind};

use super::{
    Parser,
    error::ParserError,
    node::{Node, StmtKind},
};

impl<'a> Parser<'a> {
    /// `if cond { .. } [else { .. } | else if ..]`
    ///
    /// An `else if` chain nests: the else block holds exactly one `If` statement.
    pub fn parse_if_stmt(&mut self) -> Result<Index, ParserError> {
        let if_keyword_token = *self.current();
        self.advance(); // consume 'if'

        let cond = self.parse_expr()?;
        let (then_block, mut span) = self.parse_block_body()?;
        span.connect_mut(&if_keyword_token.span);

        let else_block = if self.current().kind == TokenKind::Keyword(Keyword::Else) {
            self.advance(); // consume 'else'
            if self.current().kind == TokenKind::Keyword(Keyword::If) {
                let nested = self.parse_if_stmt()?;
                span.connect_mut(&self.node_span(nested, "else-if node")?);
                Some(vec![nested])
            } else {
                let (block, else_span) = self.parse_block_body()?;
                span.connect_mut(&else_span);
                Some(block)
            }
        } else {
            None
        };

        Ok(self.push(Node::stmt(
            StmtKind::If {
                cond,
                then_block,
                else_block,
            },
            span,
        )))
    }
}

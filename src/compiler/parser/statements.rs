use generational_arena::Index;

use super::{
    Parser,
    error::ParserError,
    node::{Binding, Node, StmtKind},
};
use crate::compiler::tokens::{Keyword, Punctuation, TokenKind};

impl<'a> Parser<'a> {
    pub fn parse_statement(&mut self) -> Result<Index, ParserError> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::Let) => self.parse_let_stmt(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_stmt(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_stmt(),
            TokenKind::Keyword(Keyword::Else) => Err(ParserError::Unexpected {
                what: "'else' without a preceding 'if'".to_string(),
                span: self.current().span.to_display(self.interner),
            }),
            _ => {
                let expr_idx = self.parse_expr()?;
                let expr_span = self.node_span(expr_idx, "expression node for statement")?;
                let semicolon_token = self.expect_punct(Punctuation::Semicolon, "';' after expression statement")?;

                Ok(self.push(Node::stmt(
                    StmtKind::Expr { expr: expr_idx },
                    expr_span.connect_new(&semicolon_token.span),
                )))
            }
        }
    }

    /// `let name [: type] = value;`
    fn parse_let_stmt(&mut self) -> Result<Index, ParserError> {
        let let_keyword_token = *self.current();
        self.advance(); // consume 'let'

        let name_token = *self.current();
        let TokenKind::Identifier(name_symbol) = name_token.kind else {
            return Err(self.expected("identifier after 'let'"));
        };
        self.advance(); // consume identifier

        let type_annotation = if self.is_punct(Punctuation::Colon) {
            self.advance(); // consume ':'
            Some(self.parse_type()?.0)
        } else {
            None
        };

        self.expect_punct(Punctuation::Eq, "'=' with an initializer")?;

        let value = self.parse_expr()?;
        let semicolon_token = self.expect_punct(Punctuation::Semicolon, "';' after let binding")?;

        Ok(self.push(Node::stmt(
            StmtKind::Let {
                binding: Binding::unresolved(name_symbol),
                type_annotation,
                value,
            },
            let_keyword_token.span.connect_new(&semicolon_token.span),
        )))
    }

    fn parse_return_stmt(&mut self) -> Result<Index, ParserError> {
        let return_keyword_token = *self.current();
        self.advance(); // consume 'return'

        let value = if self.is_punct(Punctuation::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        let semicolon_token = self.expect_punct(Punctuation::Semicolon, "';' after return")?;

        Ok(self.push(Node::stmt(
            StmtKind::Return { value },
            return_keyword_token.span.connect_new(&semicolon_token.span),
        )))
    }
}

use generational_arena::Index;
use string_interner::symbol::SymbolUsize;

use crate::compiler::tokens::{Punctuation, Token, TokenKind};

use super::{
    Parser,
    error::ParserError,
    node::{Binding, ExprKind, Node},
};

impl<'a> Parser<'a> {
    pub fn parse_identifier_nud(&mut self, ident_token: Token) -> Result<Index, ParserError> {
        let TokenKind::Identifier(name_symbol) = ident_token.kind else {
            return Err(ParserError::Invalid {
                what: "token in identifier context".to_string(),
                reason: format!("Expected identifier, got {:?}", ident_token.kind),
                span: ident_token.span.to_display(self.interner),
            });
        };

        self.advance(); // consume the identifier token

        // check if this is a function call
        if self.is_punct(Punctuation::OpenParen) {
            self.parse_function_call(ident_token, name_symbol)
        } else {
            Ok(self.push(Node::expr(ExprKind::Var(Binding::unresolved(name_symbol)), ident_token.span)))
        }
    }

    pub fn parse_function_call(&mut self, ident_token: Token, name_symbol: SymbolUsize) -> Result<Index, ParserError> {
        let mut call_span = ident_token.span;

        self.advance(); // consume '('

        let mut args = Vec::new();

        // handle empty argument list
        if self.is_punct(Punctuation::CloseParen) {
            call_span.connect_mut(&self.current().span);
            self.advance(); // consume ')'
        } else {
            loop {
                args.push(self.parse_expr()?);

                match self.current().kind {
                    TokenKind::Punctuation(Punctuation::Comma) => {
                        self.advance(); // consume ','
                    }
                    TokenKind::Punctuation(Punctuation::CloseParen) => {
                        call_span.connect_mut(&self.current().span);
                        self.advance(); // consume ')'
                        break;
                    }
                    _ => return Err(self.expected("closing parenthesis or comma")),
                }
            }
        }

        Ok(self.push(Node::expr(ExprKind::Call { func: name_symbol, args }, call_span)))
    }
}

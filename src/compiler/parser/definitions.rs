use generational_arena::Index;

use crate::compiler::tokens::{Keyword, Punctuation, Span, TokenKind};

use super::{
    Parser,
    error::ParserError,
    node::{DefKind, Marker, Node, NodeKind, Param, VType},
};

impl<'a> Parser<'a> {
    /// Parse a type annotation and return both the type and its span.
    /// Advances the cursor past the type.
    pub fn parse_type(&mut self) -> Result<(VType, Span), ParserError> {
        let token = *self.current();
        let ty = match token.kind {
            TokenKind::TypeLiteral(ty) => VType::Primitive(ty),
            TokenKind::Identifier(name) => VType::Custom(name),
            _ => return Err(self.expected("type (primitive or identifier)")),
        };
        self.advance();
        Ok((ty, token.span))
    }

    pub fn parse_def(&mut self) -> Result<Index, ParserError> {
        let marker = if self.is_punct(Punctuation::Hash) {
            Some(self.parse_marker()?)
        } else {
            None
        };

        match self.current().kind {
            TokenKind::Keyword(Keyword::Fn) => self.parse_fn_def(marker),
            _ => Err(ParserError::Unexpected {
                what: format!("token at top level: {:?}", self.current().kind),
                span: self.current().span.to_display(self.interner),
            }),
        }
    }

    /// `#[autograph]` or `#[autograph(prefix = "..", auto_prefix = "..")]`
    fn parse_marker(&mut self) -> Result<Marker, ParserError> {
        let hash_token = self.expect_punct(Punctuation::Hash, "'#'")?;
        self.expect_punct(Punctuation::OpenBracket, "'[' after '#'")?;

        let name_token = *self.current();
        match name_token.kind {
            TokenKind::Identifier(name) if self.interner.resolve(name) == Some("autograph") => self.advance(),
            _ => return Err(self.expected("'autograph' attribute")),
        }

        let mut marker = Marker {
            prefix: None,
            auto_prefix: None,
            span: hash_token.span,
        };

        if self.is_punct(Punctuation::OpenParen) {
            self.advance(); // consume '('
            while !self.is_punct(Punctuation::CloseParen) {
                let key_token = *self.current();
                let TokenKind::Identifier(key) = key_token.kind else {
                    return Err(self.expected("attribute key"));
                };
                self.advance();
                self.expect_punct(Punctuation::Eq, "'=' after attribute key")?;

                let TokenKind::StringLiteral(value) = self.current().kind else {
                    return Err(self.expected("string value"));
                };
                self.advance();

                match self.interner.resolve(key) {
                    Some("prefix") => marker.prefix = Some(value),
                    Some("auto_prefix") => marker.auto_prefix = Some(value),
                    other => {
                        return Err(ParserError::Invalid {
                            what: "attribute key".to_string(),
                            reason: format!("unknown key '{}', expected 'prefix' or 'auto_prefix'", other.unwrap_or("<unknown>")),
                            span: key_token.span.to_display(self.interner),
                        });
                    }
                }

                if self.is_punct(Punctuation::Comma) {
                    self.advance();
                } else if !self.is_punct(Punctuation::CloseParen) {
                    return Err(self.expected("',' or ')'"));
                }
            }
            self.advance(); // consume ')'
        }

        let close = self.expect_punct(Punctuation::CloseBracket, "']' closing the attribute")?;
        marker.span.connect_mut(&close.span);
        Ok(marker)
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParserError> {
        self.expect_punct(Punctuation::OpenParen, "opening parenthesis after function name")?;

        let mut params = Vec::new();
        while !self.is_punct(Punctuation::CloseParen) {
            let name_token = *self.current();
            let TokenKind::Identifier(name) = name_token.kind else {
                return Err(self.expected("parameter name"));
            };
            self.advance();
            self.expect_punct(Punctuation::Colon, "colon after parameter name")?;
            let (ty, type_span) = self.parse_type()?;

            params.push(Param {
                name,
                var: None,
                ty,
                span: name_token.span.connect_new(&type_span),
            });

            if self.is_punct(Punctuation::Comma) {
                self.advance();
            } else if !self.is_punct(Punctuation::CloseParen) {
                return Err(self.expected("comma between parameters"));
            }
        }
        self.advance(); // consume ')'

        Ok(params)
    }

    fn parse_fn_def(&mut self, marker: Option<Marker>) -> Result<Index, ParserError> {
        let mut start_span = self.current().span;
        if let Some(marker) = &marker {
            start_span.connect_mut(&marker.span);
        }
        self.advance(); // we know there's a fn keyword

        let TokenKind::Identifier(name) = self.current().kind else {
            return Err(self.expected("identifier after 'fn'"));
        };
        self.advance();

        let params = self.parse_params()?;

        let return_type = if self.is_punct(Punctuation::Colon) {
            self.advance();
            Some(self.parse_type()?.0)
        } else {
            None
        };

        if !self.is_punct(Punctuation::OpenBrace) {
            return Err(self.expected("function body (opening brace)"));
        }
        let (body, body_span) = self.parse_block_body()?;

        Ok(self.push(Node::new(
            NodeKind::Def {
                kind: DefKind::Function {
                    name,
                    params,
                    body,
                    return_type,
                    marker,
                },
            },
            start_span.connect_new(&body_span),
        )))
    }
}

use generational_arena::Index;

use crate::compiler::tokens::{Punctuation, Token, TokenKind};

use super::{
    Parser,
    error::ParserError,
    node::{Binding, ExprKind, Fixity, Node, StepKind, UnaryOpKind},
    precedence::BindingPower,
};

impl<'a> Parser<'a> {
    pub fn parse_unary_op_nud(&mut self, op_token: Token) -> Result<Index, ParserError> {
        let op_kind = match op_token.kind {
            TokenKind::Punctuation(Punctuation::Bang) => UnaryOpKind::Not,
            TokenKind::Punctuation(Punctuation::Minus) => UnaryOpKind::Neg,
            _ => {
                return Err(ParserError::Invalid {
                    what: "unary operator".to_string(),
                    reason: format!("Token {:?} is not a unary prefix operator", op_token.kind),
                    span: op_token.span.to_display(self.interner),
                });
            }
        };

        self.advance(); // consume the operator

        let expr_idx = self.pratt_parse_expression(BindingPower::Unary)?;
        let combined_span = op_token.span.connect_new(&self.node_span(expr_idx, "unary operand node")?);

        Ok(self.push(Node::expr(
            ExprKind::UnaryOp {
                op: op_kind,
                expr: expr_idx,
            },
            combined_span,
        )))
    }

    /// `++x` / `--x`
    pub fn parse_prefix_step_nud(&mut self, op_token: Token) -> Result<Index, ParserError> {
        let kind = step_kind(op_token.kind).ok_or_else(|| ParserError::Invalid {
            what: "step operator".to_string(),
            reason: format!("Token {:?} is not ++ or --", op_token.kind),
            span: op_token.span.to_display(self.interner),
        })?;

        self.advance(); // consume the operator

        let target_token = *self.current();
        let TokenKind::Identifier(name) = target_token.kind else {
            return Err(ParserError::Invalid {
                what: "increment target".to_string(),
                reason: "Only variables can be incremented or decremented".to_string(),
                span: target_token.span.to_display(self.interner),
            });
        };
        self.advance();

        Ok(self.push(Node::expr(
            ExprKind::Step {
                target: Binding::unresolved(name),
                kind,
                fixity: Fixity::Prefix,
            },
            op_token.span.connect_new(&target_token.span),
        )))
    }
}

pub fn step_kind(kind: TokenKind) -> Option<StepKind> {
    match kind {
        TokenKind::Punctuation(Punctuation::PlusPlus) => Some(StepKind::Increment),
        TokenKind::Punctuation(Punctuation::MinusMinus) => Some(StepKind::Decrement),
        _ => None,
    }
}

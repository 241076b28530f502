use generational_arena::Index;

use super::{Parser, error::ParserError, node::BinOpKind, precedence::BindingPower};
use crate::compiler::tokens::{Punctuation, TokenKind};

/// Binding power of a token in infix or postfix position, and whether it is right-associative.
fn infix_binding_power(kind: TokenKind) -> (BindingPower, bool) {
    use Punctuation::*;
    match kind {
        TokenKind::Punctuation(Eq | PlusEq | MinusEq | StarEq | SlashEq | PercentEq | AmpEq | PipeEq | CaretEq | ShiftLeftEq | ShiftRightEq) => {
            (BindingPower::Assignment, true)
        }
        TokenKind::Punctuation(PipePipe) => (BindingPower::LogicalOr, false),
        TokenKind::Punctuation(AmpAmp) => (BindingPower::LogicalAnd, false),
        TokenKind::Punctuation(Pipe) => (BindingPower::BitwiseOr, false),
        TokenKind::Punctuation(Caret) => (BindingPower::BitwiseXor, false),
        TokenKind::Punctuation(Amp) => (BindingPower::BitwiseAnd, false),
        TokenKind::Punctuation(EqEq | NotEq) => (BindingPower::Equality, false),
        TokenKind::Punctuation(LessThan | LessThanOrEq | GreaterThan | GreaterThanOrEq) => (BindingPower::Comparison, false),
        TokenKind::Punctuation(ShiftLeft | ShiftRight) => (BindingPower::Shift, false),
        TokenKind::Punctuation(Plus | Minus) => (BindingPower::Term, false),
        TokenKind::Punctuation(Star | Slash | Percent) => (BindingPower::Factor, false),
        TokenKind::Punctuation(PlusPlus | MinusMinus) => (BindingPower::Postfix, false),
        _ => (BindingPower::None, false),
    }
}

/// Maps a binary operator token to its operator.
pub fn binary_op(kind: TokenKind) -> Option<BinOpKind> {
    use Punctuation::*;
    let TokenKind::Punctuation(punct) = kind else {
        return None;
    };
    Some(match punct {
        Plus => BinOpKind::Add,
        Minus => BinOpKind::Sub,
        Star => BinOpKind::Mul,
        Slash => BinOpKind::Div,
        Percent => BinOpKind::Mod,
        EqEq => BinOpKind::Eq,
        NotEq => BinOpKind::NotEq,
        LessThan => BinOpKind::LessThan,
        LessThanOrEq => BinOpKind::LessThanOrEq,
        GreaterThan => BinOpKind::GreaterThan,
        GreaterThanOrEq => BinOpKind::GreaterThanOrEq,
        AmpAmp => BinOpKind::LogicalAnd,
        PipePipe => BinOpKind::LogicalOr,
        Amp => BinOpKind::BitwiseAnd,
        Pipe => BinOpKind::BitwiseOr,
        Caret => BinOpKind::BitwiseXor,
        ShiftLeft => BinOpKind::ShiftLeft,
        ShiftRight => BinOpKind::ShiftRight,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    pub fn parse_expr(&mut self) -> Result<Index, ParserError> {
        self.pratt_parse_expression(BindingPower::None)
    }

    /// the core pratt parsing loop.
    /// parses an expression whose components have at least `min_bp` binding power.
    pub fn pratt_parse_expression(&mut self, min_bp: BindingPower) -> Result<Index, ParserError> {
        // 1. nud (prefix context)
        let current_token = *self.current();
        let mut left_expr_idx = match current_token.kind {
            TokenKind::IntLiteral(_) | TokenKind::FloatLiteral(_) | TokenKind::BoolLiteral(_) => self.parse_literal_nud(current_token)?,
            TokenKind::Identifier(_) => self.parse_identifier_nud(current_token)?,
            TokenKind::Punctuation(Punctuation::OpenParen) => self.parse_paren_expr_nud(current_token)?,
            TokenKind::Punctuation(Punctuation::Minus | Punctuation::Bang) => self.parse_unary_op_nud(current_token)?,
            TokenKind::Punctuation(Punctuation::PlusPlus | Punctuation::MinusMinus) => self.parse_prefix_step_nud(current_token)?,
            _ => return Err(self.expected("expression")),
        };

        // 2. led (infix/postfix context)
        loop {
            let next_token = *self.current();
            let (left_bp, is_right_associative) = infix_binding_power(next_token.kind);

            if left_bp < min_bp || left_bp == BindingPower::None {
                break;
            }

            self.advance();

            left_expr_idx = match next_token.kind {
                TokenKind::Punctuation(Punctuation::PlusPlus | Punctuation::MinusMinus) => {
                    self.parse_postfix_step_led(next_token, left_expr_idx)?
                }
                _ if left_bp == BindingPower::Assignment => self.parse_assignment_led(next_token, left_expr_idx)?,
                _ => self.parse_binary_infix_op_led(next_token, left_expr_idx, left_bp, is_right_associative)?,
            };
        }
        Ok(left_expr_idx)
    }
}

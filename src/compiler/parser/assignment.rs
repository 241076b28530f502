use generational_arena::Index;

use crate::compiler::tokens::{Punctuation, Span, Token, TokenKind};

use super::{
    Parser,
    error::ParserError,
    node::{AssignOp, BinOpKind, Binding, ExprKind, Fixity, Node, NodeKind},
    precedence::BindingPower,
    unary_ops::step_kind,
};

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let TokenKind::Punctuation(punct) = kind else {
        return None;
    };
    let op = match punct {
        Punctuation::Eq => return Some(AssignOp::Plain),
        Punctuation::PlusEq => BinOpKind::Add,
        Punctuation::MinusEq => BinOpKind::Sub,
        Punctuation::StarEq => BinOpKind::Mul,
        Punctuation::SlashEq => BinOpKind::Div,
        Punctuation::PercentEq => BinOpKind::Mod,
        Punctuation::AmpEq => BinOpKind::BitwiseAnd,
        Punctuation::PipeEq => BinOpKind::BitwiseOr,
        Punctuation::CaretEq => BinOpKind::BitwiseXor,
        Punctuation::ShiftLeftEq => BinOpKind::ShiftLeft,
        Punctuation::ShiftRightEq => BinOpKind::ShiftRight,
        _ => return None,
    };
    Some(AssignOp::Compound(op))
}

impl<'a> Parser<'a> {
    /// L-value check: only plain variables can be assigned to.
    fn assignment_target(&self, target_idx: Index, what: &str) -> Result<(Binding, Span), ParserError> {
        let target_node = self.node(&target_idx).ok_or_else(|| ParserError::NotFound {
            what: "assignment target node".to_string(),
            span: self.current().span.to_display(self.interner),
        })?;
        match &target_node.kind {
            NodeKind::Expr {
                kind: ExprKind::Var(binding),
            } => Ok((*binding, target_node.span)),
            _ => Err(ParserError::Invalid {
                what: what.to_string(),
                reason: "Only variables can be assigned to".to_string(),
                span: target_node.span.to_display(self.interner),
            }),
        }
    }

    pub fn parse_assignment_led(&mut self, op_token: Token, target_idx: Index) -> Result<Index, ParserError> {
        let (target, target_span) = self.assignment_target(target_idx, "assignment target")?;

        let op = assign_op(op_token.kind).ok_or_else(|| ParserError::Invalid {
            what: "assignment operator".to_string(),
            reason: format!("Unknown operator {:?}", op_token.kind),
            span: op_token.span.to_display(self.interner),
        })?;

        // parse rhs with right-associativity
        let value_idx = self.pratt_parse_expression(BindingPower::Assignment)?;
        let assignment_span = target_span.connect_new(&self.node_span(value_idx, "assignment value node")?);

        Ok(self.push(Node::expr(
            ExprKind::Assign {
                target,
                op,
                value: value_idx,
            },
            assignment_span,
        )))
    }

    /// `x++` / `x--`
    pub fn parse_postfix_step_led(&mut self, op_token: Token, target_idx: Index) -> Result<Index, ParserError> {
        let (target, target_span) = self.assignment_target(target_idx, "increment target")?;
        let kind = step_kind(op_token.kind).ok_or_else(|| ParserError::Invalid {
            what: "step operator".to_string(),
            reason: format!("Token {:?} is not ++ or --", op_token.kind),
            span: op_token.span.to_display(self.interner),
        })?;

        Ok(self.push(Node::expr(
            ExprKind::Step {
                target,
                kind,
                fixity: Fixity::Postfix,
            },
            target_span.connect_new(&op_token.span),
        )))
    }
}

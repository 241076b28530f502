use generational_arena::Index;

use crate::compiler::tokens::Token;

use super::{
    Parser,
    error::ParserError,
    expr::binary_op,
    node::{ExprKind, Node},
    precedence::BindingPower,
};

impl<'a> Parser<'a> {
    pub fn parse_binary_infix_op_led(
        &mut self,
        op_token: Token,
        left_idx: Index,
        op_bp: BindingPower,
        is_right_assoc: bool,
    ) -> Result<Index, ParserError> {
        let op = binary_op(op_token.kind).ok_or_else(|| ParserError::Invalid {
            what: "binary operator".to_string(),
            reason: format!("Token {:?} is not a binary infix operator", op_token.kind),
            span: op_token.span.to_display(self.interner),
        })?;

        let right_bp = if is_right_assoc { op_bp } else { op_bp + BindingPower::from(1) }; // next level for left-assoc
        let right_idx = self.pratt_parse_expression(right_bp)?;

        let left_span = self.node_span(left_idx, "left operand node")?;
        let right_span = self.node_span(right_idx, "right operand node")?;

        Ok(self.push(Node::expr(
            ExprKind::BinOp {
                left: left_idx,
                right: right_idx,
                op,
            },
            left_span.connect_new(&right_span),
        )))
    }
}

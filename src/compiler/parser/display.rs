use core::fmt;
use std::fmt::{Display, Formatter};

use generational_arena::{Arena, Index};
use string_interner::symbol::SymbolUsize;

use crate::compiler::Interner;

use super::node::{AssignOp, BinOpKind, Binding, DefKind, ExprKind, Node, NodeKind, StmtKind, Target, VType};

impl Display for BinOpKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BinOpKind::Add => write!(f, "+"),
            BinOpKind::Sub => write!(f, "-"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "/"),
            BinOpKind::Mod => write!(f, "%"),
            BinOpKind::Eq => write!(f, "=="),
            BinOpKind::NotEq => write!(f, "!="),
            BinOpKind::LessThan => write!(f, "<"),
            BinOpKind::LessThanOrEq => write!(f, "<="),
            BinOpKind::GreaterThan => write!(f, ">"),
            BinOpKind::GreaterThanOrEq => write!(f, ">="),
            BinOpKind::LogicalAnd => write!(f, "&&"),
            BinOpKind::LogicalOr => write!(f, "||"),
            BinOpKind::BitwiseAnd => write!(f, "&"),
            BinOpKind::BitwiseOr => write!(f, "|"),
            BinOpKind::BitwiseXor => write!(f, "^"),
            BinOpKind::ShiftLeft => write!(f, "<<"),
            BinOpKind::ShiftRight => write!(f, ">>"),
        }
    }
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssignOp::Plain => write!(f, "="),
            AssignOp::Compound(op) => write!(f, "{}=", op),
        }
    }
}

fn format_symbol(sym: SymbolUsize, interner: &Interner) -> String {
    interner.resolve(sym).unwrap_or("<unknown>").to_string()
}

fn format_binding(binding: &Binding, interner: &Interner) -> String {
    let resolved = if binding.var.is_some() { "" } else { "?" };
    format!("\"{}{}\"", format_symbol(binding.name, interner), resolved)
}

fn format_type_val(type_val: &VType, interner: &Interner) -> String {
    match type_val {
        VType::Primitive(pt) => format!("Primitive{{type:\"{:?}\"}}", pt),
        VType::Custom(s_idx) => {
            format!("Custom{{name:\"{}\"}}", format_symbol(*s_idx, interner))
        }
    }
}

fn format_optional_type(opt_type: Option<&VType>, interner: &Interner) -> String {
    opt_type.map(|t| format_type_val(t, interner)).unwrap_or_else(|| "∅".to_string())
}

fn format_node_to_string(idx: Index, arena: &Arena<Node>, interner: &Interner) -> String {
    arena
        .get(idx)
        .map(|node| node.to_json_like_string(arena, interner))
        .unwrap_or_else(|| "null".to_string())
}

fn format_optional_node_to_string(opt_idx: Option<Index>, arena: &Arena<Node>, interner: &Interner) -> String {
    opt_idx
        .map(|idx| format_node_to_string(idx, arena, interner))
        .unwrap_or_else(|| "null".to_string())
}

fn format_node_list_to_string(indices: &[Index], arena: &Arena<Node>, interner: &Interner) -> String {
    let items = indices
        .iter()
        .map(|idx| format_node_to_string(*idx, arena, interner))
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}]", items)
}

impl Node {
    /// A compact single-line dump; a `?` suffix marks an unresolved name.
    pub fn to_json_like_string(&self, arena: &Arena<Node>, interner: &Interner) -> String {
        match &self.kind {
            NodeKind::Root { defs } => {
                format!("Root{{defs:{}}}", format_node_list_to_string(defs, arena, interner))
            }
            NodeKind::Expr { kind } => format!("Expr{{{}}}", kind.to_json_like_string(arena, interner)),
            NodeKind::Stmt { kind } => format!("Stmt{{{}}}", kind.to_json_like_string(arena, interner)),
            NodeKind::Def { kind } => {
                format!("Def{{kind:{}}}", kind.to_json_like_string(arena, interner))
            }
        }
    }
}

impl StmtKind {
    fn to_json_like_string(&self, arena: &Arena<Node>, interner: &Interner) -> String {
        match self {
            StmtKind::Let {
                binding,
                type_annotation,
                value,
            } => format!(
                "Let{{name:{},type_annotation:{},value:{}}}",
                format_binding(binding, interner),
                format_optional_type(type_annotation.as_ref(), interner),
                format_node_to_string(*value, arena, interner)
            ),
            StmtKind::Expr { expr } => format_node_to_string(*expr, arena, interner),
            StmtKind::Return { value } => format!("Return{{value:{}}}", format_optional_node_to_string(*value, arena, interner)),
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => format!(
                "If{{cond:{},then:{},else:{}}}",
                format_node_to_string(*cond, arena, interner),
                format_node_list_to_string(then_block, arena, interner),
                else_block
                    .as_ref()
                    .map(|block| format_node_list_to_string(block, arena, interner))
                    .unwrap_or_else(|| "null".to_string())
            ),
            StmtKind::Destructure { targets, value } => {
                let targets = targets
                    .iter()
                    .map(|target| match target {
                        Target::Bind(binding) => format_binding(binding, interner),
                        Target::Discard => "_".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                format!("Destructure{{targets:[{}],value:{}}}", targets, format_node_to_string(*value, arena, interner))
            }
        }
    }
}

impl ExprKind {
    fn to_json_like_string(&self, arena: &Arena<Node>, interner: &Interner) -> String {
        match self {
            ExprKind::Literal(lit) => format!("Literal{{value:{:?}}}", lit),
            ExprKind::Var(binding) => format!("Var{{name:{}}}", format_binding(binding, interner)),
            ExprKind::Assign { target, op, value } => format!(
                "Assign{{op:\"{}\",target:{},value:{}}}",
                op,
                format_binding(target, interner),
                format_node_to_string(*value, arena, interner)
            ),
            ExprKind::Step { target, kind, fixity } => format!(
                "Step{{kind:\"{:?}\",fixity:\"{:?}\",target:{}}}",
                kind,
                fixity,
                format_binding(target, interner)
            ),
            ExprKind::BinOp { left, right, op } => format!(
                "BinOp{{op:\"{}\",left:{},right:{}}}",
                op,
                format_node_to_string(*left, arena, interner),
                format_node_to_string(*right, arena, interner)
            ),
            ExprKind::UnaryOp { op, expr } => format!("UnaryOp{{op:\"{:?}\",expr:{}}}", op, format_node_to_string(*expr, arena, interner)),
            ExprKind::Call { func, args } => format!(
                "Call{{func:\"{}\",args:{}}}",
                format_symbol(*func, interner),
                format_node_list_to_string(args, arena, interner)
            ),
            ExprKind::Tuple { items } => format!("Tuple{{items:{}}}", format_node_list_to_string(items, arena, interner)),
            ExprKind::Closure { body } => format!("Closure{{body:{}}}", format_node_list_to_string(body, arena, interner)),
            ExprKind::Intrinsic { op, args } => format!(
                "Intrinsic{{op:\"{}\",args:{}}}",
                op.name(),
                format_node_list_to_string(args, arena, interner)
            ),
        }
    }
}

impl DefKind {
    fn to_json_like_string(&self, arena: &Arena<Node>, interner: &Interner) -> String {
        match self {
            DefKind::Function {
                name,
                params,
                body,
                return_type,
                marker,
            } => {
                let params_str = params
                    .iter()
                    .map(|param| {
                        format!(
                            "Param{{name:\"{}\",type:{}}}",
                            format_symbol(param.name, interner),
                            format_type_val(&param.ty, interner)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                let marker_str = marker
                    .as_ref()
                    .map(|m| {
                        let prefix = m.prefix.map(|p| format_symbol(p, interner)).unwrap_or_default();
                        let auto_prefix = m.auto_prefix.map(|p| format_symbol(p, interner)).unwrap_or_default();
                        format!("Marker{{prefix:\"{}\",auto_prefix:\"{}\"}}", prefix, auto_prefix)
                    })
                    .unwrap_or_else(|| "null".to_string());
                format!(
                    "Function{{name:\"{}\",marker:{},params:[{}],body:{},return_type:{}}}",
                    format_symbol(*name, interner),
                    marker_str,
                    params_str,
                    format_node_list_to_string(body, arena, interner),
                    format_optional_type(return_type.as_ref(), interner)
                )
            }
        }
    }
}

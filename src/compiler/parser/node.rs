use generational_arena::Index;
use string_interner::symbol::SymbolUsize;

use crate::compiler::{
    analysis::VarId,
    tokens::{PrimitiveTypes, Span},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VType {
    Primitive(PrimitiveTypes),
    Custom(SymbolUsize),
}

impl VType {
    pub fn is_primitive(&self) -> bool {
        matches!(self, VType::Primitive(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    LessThan,
    LessThanOrEq,
    GreaterThan,
    GreaterThanOrEq,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Neg,
    Not,
}

/// Every assignment operator, `=` and the compound forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Plain,
    Compound(BinOpKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Postfix,
}

/// Graph-construction calls emitted by the lowering. Never produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Select,
    GraphConst,
    Placeholder,
    Run,
}

impl Intrinsic {
    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Select => "select",
            Intrinsic::GraphConst => "graph_const",
            Intrinsic::Placeholder => "placeholder",
            Intrinsic::Run => "run",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A use or definition site of a variable. `var` is filled in by name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub name: SymbolUsize,
    pub var: Option<VarId>,
}

impl Binding {
    pub fn unresolved(name: SymbolUsize) -> Self {
        Self { name, var: None }
    }

    pub fn resolved(name: SymbolUsize, var: VarId) -> Self {
        Self { name, var: Some(var) }
    }
}

/// One slot of a destructuring bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Bind(Binding),
    Discard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: SymbolUsize,
    pub var: Option<VarId>,
    pub ty: VType,
    pub span: Span,
}

/// `#[autograph(prefix = "..", auto_prefix = "..")]`
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub prefix: Option<SymbolUsize>,
    pub auto_prefix: Option<SymbolUsize>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root { defs: Vec<Index> },
    Def { kind: DefKind },
    Stmt { kind: StmtKind },
    Expr { kind: ExprKind },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefKind {
    Function {
        name: SymbolUsize,
        params: Vec<Param>,
        body: Vec<Index>,
        return_type: Option<VType>,
        marker: Option<Marker>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Let {
        binding: Binding,
        type_annotation: Option<VType>,
        value: Index,
    },
    Expr {
        expr: Index,
    },
    Return {
        value: Option<Index>,
    },
    If {
        cond: Index,
        then_block: Vec<Index>,
        else_block: Option<Vec<Index>>,
    },
    Destructure {
        targets: Vec<Target>,
        value: Index,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Var(Binding),
    BinOp {
        left: Index,
        right: Index,
        op: BinOpKind,
    },
    UnaryOp {
        op: UnaryOpKind,
        expr: Index,
    },
    Assign {
        target: Binding,
        op: AssignOp,
        value: Index,
    },
    Step {
        target: Binding,
        kind: StepKind,
        fixity: Fixity,
    },
    Call {
        func: SymbolUsize,
        args: Vec<Index>,
    },
    Tuple {
        items: Vec<Index>,
    },
    Closure {
        body: Vec<Index>,
    },
    Intrinsic {
        op: Intrinsic,
        args: Vec<Index>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn stmt(kind: StmtKind, span: Span) -> Self {
        Self::new(NodeKind::Stmt { kind }, span)
    }

    pub fn expr(kind: ExprKind, span: Span) -> Self {
        Self::new(NodeKind::Expr { kind }, span)
    }

    pub fn as_stmt(&self) -> Option<&StmtKind> {
        match &self.kind {
            NodeKind::Stmt { kind } => Some(kind),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&ExprKind> {
        match &self.kind {
            NodeKind::Expr { kind } => Some(kind),
            _ => None,
        }
    }
}

fn map_all(indices: &[Index], f: &mut impl FnMut(Index) -> Index) -> Vec<Index> {
    indices.iter().map(|&i| f(i)).collect()
}

impl NodeKind {
    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<Index> {
        match self {
            NodeKind::Root { defs } => defs.clone(),
            NodeKind::Def {
                kind: DefKind::Function { body, .. },
            } => body.clone(),
            NodeKind::Stmt { kind } => match kind {
                StmtKind::Let { value, .. } | StmtKind::Expr { expr: value } | StmtKind::Destructure { value, .. } => vec![*value],
                StmtKind::Return { value } => value.iter().copied().collect(),
                StmtKind::If {
                    cond,
                    then_block,
                    else_block,
                } => std::iter::once(*cond)
                    .chain(then_block.iter().copied())
                    .chain(else_block.iter().flatten().copied())
                    .collect(),
            },
            NodeKind::Expr { kind } => match kind {
                ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::Step { .. } => Vec::new(),
                ExprKind::BinOp { left, right, .. } => vec![*left, *right],
                ExprKind::UnaryOp { expr, .. } | ExprKind::Assign { value: expr, .. } => vec![*expr],
                ExprKind::Call { args, .. } | ExprKind::Tuple { items: args } | ExprKind::Intrinsic { args, .. } => args.clone(),
                ExprKind::Closure { body } => body.clone(),
            },
        }
    }

    /// Rebuilds the kind with every child index passed through `f`, in the order of [`NodeKind::children`].
    pub fn map_children(&self, f: &mut impl FnMut(Index) -> Index) -> NodeKind {
        match self {
            NodeKind::Root { defs } => NodeKind::Root { defs: map_all(defs, f) },
            NodeKind::Def {
                kind:
                    DefKind::Function {
                        name,
                        params,
                        body,
                        return_type,
                        marker,
                    },
            } => NodeKind::Def {
                kind: DefKind::Function {
                    name: *name,
                    params: params.clone(),
                    body: map_all(body, f),
                    return_type: return_type.clone(),
                    marker: marker.clone(),
                },
            },
            NodeKind::Stmt { kind } => NodeKind::Stmt {
                kind: match kind {
                    StmtKind::Let {
                        binding,
                        type_annotation,
                        value,
                    } => StmtKind::Let {
                        binding: *binding,
                        type_annotation: type_annotation.clone(),
                        value: f(*value),
                    },
                    StmtKind::Expr { expr } => StmtKind::Expr { expr: f(*expr) },
                    StmtKind::Return { value } => StmtKind::Return { value: value.map(&mut *f) },
                    StmtKind::If {
                        cond,
                        then_block,
                        else_block,
                    } => {
                        let cond = f(*cond);
                        let then_block = map_all(then_block, f);
                        let else_block = else_block.as_ref().map(|block| map_all(block, f));
                        StmtKind::If {
                            cond,
                            then_block,
                            else_block,
                        }
                    }
                    StmtKind::Destructure { targets, value } => StmtKind::Destructure {
                        targets: targets.clone(),
                        value: f(*value),
                    },
                },
            },
            NodeKind::Expr { kind } => NodeKind::Expr {
                kind: match kind {
                    ExprKind::Literal(_) | ExprKind::Var(_) | ExprKind::Step { .. } => kind.clone(),
                    ExprKind::BinOp { left, right, op } => {
                        let left = f(*left);
                        let right = f(*right);
                        ExprKind::BinOp { left, right, op: *op }
                    }
                    ExprKind::UnaryOp { op, expr } => ExprKind::UnaryOp { op: *op, expr: f(*expr) },
                    ExprKind::Assign { target, op, value } => ExprKind::Assign {
                        target: *target,
                        op: *op,
                        value: f(*value),
                    },
                    ExprKind::Call { func, args } => ExprKind::Call {
                        func: *func,
                        args: map_all(args, f),
                    },
                    ExprKind::Tuple { items } => ExprKind::Tuple { items: map_all(items, f) },
                    ExprKind::Closure { body } => ExprKind::Closure { body: map_all(body, f) },
                    ExprKind::Intrinsic { op, args } => ExprKind::Intrinsic {
                        op: *op,
                        args: map_all(args, f),
                    },
                },
            },
        }
    }
}

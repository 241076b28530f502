//! Renders a tree back to source text.
//!
//! Lowered programs contain constructs the parser does not accept (deferred
//! bodies, tuples, destructuring binds, intrinsic calls); they are printed in
//! the forms listed in the crate documentation.

use std::fmt::Write;

use generational_arena::{Arena, Index};
use string_interner::symbol::SymbolUsize;

use crate::compiler::{
    Interner,
    parser::node::{BinOpKind, Binding, DefKind, ExprKind, Fixity, Literal, Marker, Node, NodeKind, Param, StepKind, StmtKind, Target, UnaryOpKind, VType},
    tokens::PrimitiveTypes,
};

const INDENT: &str = "    ";

fn precedence(op: BinOpKind) -> u8 {
    match op {
        BinOpKind::LogicalOr => 1,
        BinOpKind::LogicalAnd => 2,
        BinOpKind::BitwiseOr => 3,
        BinOpKind::BitwiseXor => 4,
        BinOpKind::BitwiseAnd => 5,
        BinOpKind::Eq | BinOpKind::NotEq => 6,
        BinOpKind::LessThan | BinOpKind::LessThanOrEq | BinOpKind::GreaterThan | BinOpKind::GreaterThanOrEq => 7,
        BinOpKind::ShiftLeft | BinOpKind::ShiftRight => 8,
        BinOpKind::Add | BinOpKind::Sub => 9,
        BinOpKind::Mul | BinOpKind::Div | BinOpKind::Mod => 10,
    }
}

const UNARY_PRECEDENCE: u8 = 11;

pub struct Emitter<'a> {
    tree: &'a Arena<Node>,
    interner: &'a Interner,
    out: String,
    depth: usize,
}

/// Renders every definition under `root`, separated by blank lines.
pub fn render(root: &Node, tree: &Arena<Node>, interner: &Interner) -> String {
    let mut emitter = Emitter::new(tree, interner);
    emitter.node(root);
    emitter.out
}

/// Renders a statement sequence at the top level, one statement per line.
pub fn render_stmts(stmts: &[Index], tree: &Arena<Node>, interner: &Interner) -> String {
    let mut emitter = Emitter::new(tree, interner);
    for &stmt in stmts {
        emitter.stmt(stmt);
    }
    emitter.out
}

impl<'a> Emitter<'a> {
    pub fn new(tree: &'a Arena<Node>, interner: &'a Interner) -> Self {
        Self {
            tree,
            interner,
            out: String::new(),
            depth: 0,
        }
    }

    fn symbol(&self, symbol: SymbolUsize) -> &'a str {
        self.interner.resolve(symbol).unwrap_or("<unknown>")
    }

    fn binding(&self, binding: &Binding) -> &'a str {
        self.symbol(binding.name)
    }

    fn line_start(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn node(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Root { defs } => {
                for (i, &def) in defs.iter().enumerate() {
                    if i > 0 {
                        self.out.push('\n');
                    }
                    if let Some(def) = self.tree.get(def) {
                        self.node(def);
                    }
                }
            }
            NodeKind::Def { kind } => self.def(kind),
            NodeKind::Stmt { .. } | NodeKind::Expr { .. } => {
                let text = self.expr_text(node);
                self.out.push_str(&text);
            }
        }
    }

    fn ty(&self, ty: &VType) -> &'a str {
        match ty {
            VType::Primitive(PrimitiveTypes::I32) => "i32",
            VType::Primitive(PrimitiveTypes::I64) => "i64",
            VType::Primitive(PrimitiveTypes::F32) => "f32",
            VType::Primitive(PrimitiveTypes::F64) => "f64",
            VType::Primitive(PrimitiveTypes::Bool) => "bool",
            VType::Primitive(PrimitiveTypes::Symbolic) => "symbolic",
            VType::Custom(name) => self.symbol(*name),
        }
    }

    fn marker(&mut self, marker: &Marker) {
        let mut args = Vec::new();
        if let Some(prefix) = marker.prefix {
            args.push(format!("prefix = \"{}\"", self.symbol(prefix)));
        }
        if let Some(auto_prefix) = marker.auto_prefix {
            args.push(format!("auto_prefix = \"{}\"", self.symbol(auto_prefix)));
        }
        if args.is_empty() {
            self.out.push_str("#[autograph]\n");
        } else {
            let _ = writeln!(self.out, "#[autograph({})]", args.join(", "));
        }
    }

    fn params(&self, params: &[Param]) -> String {
        params
            .iter()
            .map(|param| format!("{}: {}", self.symbol(param.name), self.ty(&param.ty)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn def(&mut self, kind: &DefKind) {
        let DefKind::Function {
            name,
            params,
            body,
            return_type,
            marker,
        } = kind;
        if let Some(marker) = marker {
            self.marker(marker);
        }
        let _ = write!(self.out, "fn {}({})", self.symbol(*name), self.params(params));
        if let Some(ty) = return_type {
            let _ = write!(self.out, ": {}", self.ty(ty));
        }
        self.out.push(' ');
        self.block(body);
        self.out.push('\n');
    }

    /// `{`, the statements one level deeper, and the closing brace at the current level.
    fn block(&mut self, stmts: &[Index]) {
        self.out.push_str("{\n");
        self.depth += 1;
        for &stmt in stmts {
            self.stmt(stmt);
        }
        self.depth -= 1;
        self.line_start();
        self.out.push('}');
    }

    fn stmt(&mut self, idx: Index) {
        let Some(node) = self.tree.get(idx) else {
            return;
        };
        self.line_start();
        let Some(kind) = node.as_stmt() else {
            let text = self.expr_text(node);
            let _ = writeln!(self.out, "{};", text);
            return;
        };
        match kind {
            StmtKind::Let {
                binding,
                type_annotation,
                value,
            } => {
                let _ = write!(self.out, "let {}", self.binding(binding));
                if let Some(ty) = type_annotation {
                    let _ = write!(self.out, ": {}", self.ty(ty));
                }
                self.out.push_str(" = ");
                self.expr_inline(*value);
                self.out.push_str(";\n");
            }
            StmtKind::Expr { expr } => {
                self.expr_inline(*expr);
                self.out.push_str(";\n");
            }
            StmtKind::Return { value: None } => self.out.push_str("return;\n"),
            StmtKind::Return { value: Some(value) } => {
                self.out.push_str("return ");
                self.expr_inline(*value);
                self.out.push_str(";\n");
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.out.push_str("if ");
                self.expr_inline(*cond);
                self.out.push(' ');
                self.block(then_block);
                if let Some(else_block) = else_block {
                    self.out.push_str(" else ");
                    self.block(else_block);
                }
                self.out.push('\n');
            }
            StmtKind::Destructure { targets, value } => {
                let names: Vec<String> = targets
                    .iter()
                    .map(|target| match target {
                        Target::Bind(binding) => self.binding(binding).to_string(),
                        Target::Discard => "_".to_string(),
                    })
                    .collect();
                let _ = write!(self.out, "{} = ", tuple_text(&names));
                self.expr_inline(*value);
                self.out.push_str(";\n");
            }
        }
    }

    /// Writes an expression in place. Deferred bodies span several lines.
    fn expr_inline(&mut self, idx: Index) {
        let Some(node) = self.tree.get(idx) else {
            self.out.push_str("<missing>");
            return;
        };
        if let Some(ExprKind::Closure { body }) = node.as_expr() {
            self.out.push_str("|| ");
            self.block(body);
            return;
        }
        let text = self.expr_text(node);
        self.out.push_str(&text);
    }

    fn child_text(&mut self, idx: Index) -> String {
        match self.tree.get(idx) {
            Some(node) => self.expr_text(node),
            None => "<missing>".to_string(),
        }
    }

    /// Like [`Self::child_text`], parenthesized when the child binds looser than `min`.
    fn operand_text(&mut self, idx: Index, min: u8) -> String {
        let text = self.child_text(idx);
        let binds = match self.tree.get(idx).and_then(Node::as_expr) {
            Some(ExprKind::BinOp { op, .. }) => precedence(*op),
            Some(ExprKind::Assign { .. }) => 0,
            _ => u8::MAX,
        };
        if binds < min { format!("({text})") } else { text }
    }

    fn args_text(&mut self, args: &[Index]) -> String {
        args.iter().map(|&arg| self.child_text(arg)).collect::<Vec<_>>().join(", ")
    }

    fn expr_text(&mut self, node: &Node) -> String {
        let Some(kind) = node.as_expr() else {
            return "<statement>".to_string();
        };
        match kind {
            ExprKind::Literal(Literal::Int(value)) => value.to_string(),
            ExprKind::Literal(Literal::Float(value)) => float_text(*value),
            ExprKind::Literal(Literal::Bool(value)) => value.to_string(),
            ExprKind::Var(binding) => self.binding(binding).to_string(),
            ExprKind::BinOp { left, right, op } => {
                let prec = precedence(*op);
                let left = self.operand_text(*left, prec);
                let right = self.operand_text(*right, prec + 1);
                format!("{left} {op} {right}")
            }
            ExprKind::UnaryOp { op, expr } => {
                let operand = self.operand_text(*expr, UNARY_PRECEDENCE);
                let sign = match op {
                    UnaryOpKind::Neg => "-",
                    UnaryOpKind::Not => "!",
                };
                // `- -a` must not print as the decrement `--a`
                if operand.starts_with(sign) {
                    format!("{sign}({operand})")
                } else {
                    format!("{sign}{operand}")
                }
            }
            ExprKind::Assign { target, op, value } => {
                let value = self.child_text(*value);
                format!("{} {} {}", self.binding(target), op, value)
            }
            ExprKind::Step { target, kind, fixity } => {
                let step = match kind {
                    StepKind::Increment => "++",
                    StepKind::Decrement => "--",
                };
                match fixity {
                    Fixity::Prefix => format!("{step}{}", self.binding(target)),
                    Fixity::Postfix => format!("{}{step}", self.binding(target)),
                }
            }
            ExprKind::Call { func, args } => {
                let args = self.args_text(args);
                format!("{}({args})", self.symbol(*func))
            }
            ExprKind::Intrinsic { op, args } => {
                let args = self.args_text(args);
                format!("{}({args})", op.name())
            }
            ExprKind::Tuple { items } => {
                let items: Vec<String> = items.iter().map(|&item| self.child_text(item)).collect();
                tuple_text(&items)
            }
            ExprKind::Closure { body } => {
                let mut nested = Emitter::new(self.tree, self.interner);
                nested.depth = self.depth;
                nested.out.push_str("|| ");
                nested.block(body);
                nested.out
            }
        }
    }
}

/// Plain decimal digits with a fractional part, never exponent notation.
fn float_text(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

fn tuple_text(items: &[String]) -> String {
    match items {
        [] => "()".to_string(),
        [one] => format!("({one},)"),
        _ => format!("({})", items.join(", ")),
    }
}

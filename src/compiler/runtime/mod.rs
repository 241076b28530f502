//! A tree-walking evaluator for original and lowered programs.
//!
//! Symbolic values evaluate to concrete ones, and `graph_const`, `placeholder`
//! and `run` pass their argument through, so the two forms of a procedure can
//! be compared directly. `select` evaluates its predicate and invokes exactly
//! one deferred body; the counts are available from [`Interpreter::stats`].
//! Writes a deferred body makes to outer variables stay inside it, as in a
//! graph runtime where only the selected result flows onward.

mod binary_ops;
pub mod error;
mod value;

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use string_interner::symbol::SymbolUsize;

pub use error::RuntimeError;
pub use value::Value;

use crate::compiler::{
    Interner,
    analysis::VarId,
    parser::node::{AssignOp, BinOpKind, Binding, DefKind, ExprKind, Fixity, Intrinsic, Literal, Node, NodeKind, StepKind, StmtKind, Target},
    tokens::Span,
};
use binary_ops::{OpFault, binary, unary};

const CALL_DEPTH_LIMIT: usize = 256;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub calls: usize,
    pub selects: usize,
    pub deferred_calls: usize,
}

/// Variables of one procedure activation. A deferred body runs on a copy, so
/// only the value it returns reaches the activation.
#[derive(Clone)]
struct Frame {
    vars: HashMap<VarId, Value>,
}

impl Frame {
    fn store(&mut self, binding: &Binding, value: Value) {
        if let Some(var) = binding.var {
            self.vars.insert(var, value);
        }
    }
}

enum Flow {
    Next,
    Return(Value),
}

pub struct Interpreter<'a> {
    tree: &'a Arena<Node>,
    interner: &'a Interner,
    functions: HashMap<SymbolUsize, Index>,
    stats: Stats,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    /// An evaluator for the procedures defined under `root`.
    pub fn new(root: &Node, tree: &'a Arena<Node>, interner: &'a Interner) -> Self {
        let functions = match &root.kind {
            NodeKind::Root { defs } => defs
                .iter()
                .filter_map(|&def| match tree.get(def).map(|node| &node.kind) {
                    Some(NodeKind::Def {
                        kind: DefKind::Function { name, .. },
                    }) => Some((*name, def)),
                    _ => None,
                })
                .collect(),
            _ => HashMap::new(),
        };
        Self {
            tree,
            interner,
            functions,
            stats: Stats::default(),
            depth: 0,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let symbol = self
            .interner
            .get(name)
            .filter(|symbol| self.functions.contains_key(symbol))
            .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string() })?;
        self.call_symbol(symbol, args)
    }

    fn name(&self, symbol: SymbolUsize) -> String {
        self.interner.resolve(symbol).unwrap_or("<unknown>").to_string()
    }

    fn node(&self, idx: Index) -> Result<&'a Node, RuntimeError> {
        self.tree
            .get(idx)
            .ok_or_else(|| RuntimeError::Internal(format!("node {:?} not found", idx.into_raw_parts())))
    }

    fn fault(&self, fault: OpFault, op: String, span: Span) -> RuntimeError {
        let span = span.to_display(self.interner);
        match fault {
            OpFault::DivisionByZero => RuntimeError::DivisionByZero { span },
            OpFault::TypeMismatch(found) => RuntimeError::TypeMismatch { op, found, span },
        }
    }

    fn call_symbol(&mut self, name: SymbolUsize, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let Some(&def) = self.functions.get(&name) else {
            return Err(RuntimeError::UnknownFunction { name: self.name(name) });
        };
        let NodeKind::Def {
            kind: DefKind::Function {
                params,
                body,
                return_type,
                ..
            },
        } = &self.node(def)?.kind
        else {
            return Err(RuntimeError::Internal(format!("'{}' is not a function", self.name(name))));
        };
        if params.len() != args.len() {
            return Err(RuntimeError::ArgumentCount {
                name: self.name(name),
                expected: params.len(),
                found: args.len(),
            });
        }
        if self.depth >= CALL_DEPTH_LIMIT {
            return Err(RuntimeError::RecursionLimit {
                name: self.name(name),
                limit: CALL_DEPTH_LIMIT,
            });
        }

        let mut frame = Frame { vars: HashMap::new() };
        for (param, arg) in params.iter().zip(args) {
            if let Some(var) = param.var {
                frame.vars.insert(var, arg);
            }
        }

        self.stats.calls += 1;
        self.depth += 1;
        let flow = self.exec_block(body, &mut frame);
        self.depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Next if return_type.is_none() => Ok(Value::unit()),
            Flow::Next => Err(RuntimeError::MissingReturn { name: self.name(name) }),
        }
    }

    fn exec_block(&mut self, stmts: &[Index], frame: &mut Frame) -> Result<Flow, RuntimeError> {
        for &stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt, frame)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    fn exec_stmt(&mut self, idx: Index, frame: &mut Frame) -> Result<Flow, RuntimeError> {
        let node = self.node(idx)?;
        let Some(kind) = node.as_stmt() else {
            self.eval(idx, frame)?;
            return Ok(Flow::Next);
        };
        match kind {
            StmtKind::Let { binding, value, .. } => {
                let value = self.eval(*value, frame)?;
                frame.store(binding, value);
            }
            StmtKind::Expr { expr } => {
                self.eval(*expr, frame)?;
            }
            StmtKind::Return { value: None } => return Ok(Flow::Return(Value::unit())),
            StmtKind::Return { value: Some(value) } => return Ok(Flow::Return(self.eval(*value, frame)?)),
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                let taken = match self.eval(*cond, frame)? {
                    Value::Bool(taken) => taken,
                    other => return Err(self.fault(OpFault::TypeMismatch(other.kind().to_string()), "if".to_string(), node.span)),
                };
                if taken {
                    return self.exec_block(then_block, frame);
                }
                if let Some(else_block) = else_block {
                    return self.exec_block(else_block, frame);
                }
            }
            StmtKind::Destructure { targets, value } => {
                let values = match self.eval(*value, frame)? {
                    Value::Tuple(items) => items,
                    other => vec![other],
                };
                if values.len() != targets.len() {
                    return Err(RuntimeError::ArityMismatch {
                        expected: targets.len(),
                        found: values.len(),
                        span: node.span.to_display(self.interner),
                    });
                }
                for (target, value) in targets.iter().zip(values) {
                    if let Target::Bind(binding) = target {
                        frame.store(binding, value);
                    }
                }
            }
        }
        Ok(Flow::Next)
    }

    fn load(&self, binding: &Binding, span: Span, frame: &Frame) -> Result<Value, RuntimeError> {
        binding
            .var
            .and_then(|var| frame.vars.get(&var))
            .cloned()
            .ok_or_else(|| RuntimeError::UnboundVariable {
                name: self.name(binding.name),
                span: span.to_display(self.interner),
            })
    }

    fn eval(&mut self, idx: Index, frame: &mut Frame) -> Result<Value, RuntimeError> {
        let node = self.node(idx)?;
        let Some(kind) = node.as_expr() else {
            return Err(RuntimeError::Internal("expected an expression".to_string()));
        };
        let span = node.span;
        match kind {
            ExprKind::Literal(literal) => Ok(match literal {
                Literal::Int(value) => Value::Int(*value),
                Literal::Float(value) => Value::Float(*value),
                Literal::Bool(value) => Value::Bool(*value),
            }),
            ExprKind::Var(binding) => self.load(binding, span, frame),
            ExprKind::BinOp { left, right, op } => {
                let left = self.eval(*left, frame)?;
                match (op, &left) {
                    (BinOpKind::LogicalAnd, Value::Bool(false)) => return Ok(Value::Bool(false)),
                    (BinOpKind::LogicalOr, Value::Bool(true)) => return Ok(Value::Bool(true)),
                    _ => {}
                }
                let right = self.eval(*right, frame)?;
                binary(*op, &left, &right).map_err(|fault| self.fault(fault, op.to_string(), span))
            }
            ExprKind::UnaryOp { op, expr } => {
                let operand = self.eval(*expr, frame)?;
                unary(*op, &operand).map_err(|fault| self.fault(fault, format!("{op:?}"), span))
            }
            ExprKind::Assign { target, op, value } => {
                let value = self.eval(*value, frame)?;
                let value = match op {
                    AssignOp::Plain => value,
                    AssignOp::Compound(bin_op) => {
                        let current = self.load(target, span, frame)?;
                        binary(*bin_op, &current, &value).map_err(|fault| self.fault(fault, op.to_string(), span))?
                    }
                };
                frame.store(target, value.clone());
                Ok(value)
            }
            ExprKind::Step { target, kind, fixity } => {
                let current = self.load(target, span, frame)?;
                let op = match kind {
                    StepKind::Increment => BinOpKind::Add,
                    StepKind::Decrement => BinOpKind::Sub,
                };
                let next = binary(op, &current, &Value::Int(1)).map_err(|fault| self.fault(fault, format!("{kind:?}"), span))?;
                frame.store(target, next.clone());
                Ok(match fixity {
                    Fixity::Prefix => next,
                    Fixity::Postfix => current,
                })
            }
            ExprKind::Call { func, args } => {
                let args = args.iter().map(|&arg| self.eval(arg, frame)).collect::<Result<Vec<_>, _>>()?;
                self.call_symbol(*func, args)
            }
            ExprKind::Tuple { items } => Ok(Value::Tuple(
                items.iter().map(|&item| self.eval(item, frame)).collect::<Result<_, _>>()?,
            )),
            ExprKind::Closure { .. } => Ok(Value::Thunk(idx)),
            ExprKind::Intrinsic { op: Intrinsic::Select, args } => self.select(args, span, frame),
            // graph_const, placeholder and run
            ExprKind::Intrinsic { args, .. } => match args.as_slice() {
                [value] => self.eval(*value, frame),
                _ => Err(RuntimeError::ArityMismatch {
                    expected: 1,
                    found: args.len(),
                    span: span.to_display(self.interner),
                }),
            },
        }
    }

    /// The number of values a deferred body produces, read from its first
    /// top-level `return`.
    fn deferred_arity(&self, idx: Index) -> Result<Option<usize>, RuntimeError> {
        let Some(ExprKind::Closure { body }) = self.node(idx)?.as_expr() else {
            return Ok(None);
        };
        for &stmt in body {
            if let Some(StmtKind::Return { value }) = self.node(stmt)?.as_stmt() {
                return Ok(Some(match value {
                    None => 0,
                    Some(value) => match self.node(*value)?.as_expr() {
                        Some(ExprKind::Tuple { items }) => items.len(),
                        _ => 1,
                    },
                }));
            }
        }
        Ok(None)
    }

    fn select(&mut self, args: &[Index], span: Span, frame: &mut Frame) -> Result<Value, RuntimeError> {
        let [predicate, if_true, if_false] = args else {
            return Err(RuntimeError::ArityMismatch {
                expected: 3,
                found: args.len(),
                span: span.to_display(self.interner),
            });
        };
        let predicate = match self.eval(*predicate, frame)? {
            Value::Bool(predicate) => predicate,
            other => return Err(self.fault(OpFault::TypeMismatch(other.kind().to_string()), "select".to_string(), span)),
        };
        let (Value::Thunk(if_true), Value::Thunk(if_false)) = (self.eval(*if_true, frame)?, self.eval(*if_false, frame)?) else {
            return Err(self.fault(OpFault::TypeMismatch("a non-deferred branch".to_string()), "select".to_string(), span));
        };

        if let (Some(then_arity), Some(else_arity)) = (self.deferred_arity(if_true)?, self.deferred_arity(if_false)?)
            && then_arity != else_arity
        {
            return Err(RuntimeError::ArityMismatch {
                expected: then_arity,
                found: else_arity,
                span: span.to_display(self.interner),
            });
        }

        self.stats.selects += 1;
        self.invoke(if predicate { if_true } else { if_false }, frame)
    }

    fn invoke(&mut self, thunk: Index, frame: &Frame) -> Result<Value, RuntimeError> {
        let Some(ExprKind::Closure { body }) = self.node(thunk)?.as_expr() else {
            return Err(RuntimeError::Internal("deferred body is not a closure".to_string()));
        };
        self.stats.deferred_calls += 1;
        let mut scope = frame.clone();
        match self.exec_block(body, &mut scope)? {
            Flow::Return(value) => Ok(value),
            Flow::Next => Err(RuntimeError::MissingReturn {
                name: "deferred body".to_string(),
            }),
        }
    }
}

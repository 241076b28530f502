//! Generation of the two procedures that replace a marked procedure.
//!
//! For `#[autograph] fn add(a: i32, b: i32): i32 { .. }` with the default
//! settings this produces
//!
//! ```text
//! fn add(a: i32, b: i32): i32 {
//!     let _a = placeholder(a);
//!     let _b = placeholder(b);
//!     return run(_add(_a, _b));
//! }
//!
//! fn _add(a: symbolic, b: symbolic): symbolic { /* lowered body */ }
//! ```

use generational_arena::Index;
use string_interner::symbol::SymbolUsize;
use tracing::info;

use crate::compiler::{
    Interner, LowerOptions, Settings,
    analysis::{SyntheticRole, VarOrigin},
    lower::{LoweringCtx, LoweringError},
    parser::node::{Binding, DefKind, ExprKind, Intrinsic, Marker, Node, NodeKind, Param, StmtKind, VType},
    passes::{declarations, implicit_else, literals},
    tokens::{PrimitiveTypes, Span},
};

/// A procedure definition, copied out of its node.
struct Procedure {
    name: String,
    params: Vec<Param>,
    body: Vec<Index>,
    return_type: Option<VType>,
    span: Span,
}

fn symbolic(ty: &VType) -> VType {
    if ty.is_primitive() {
        VType::Primitive(PrimitiveTypes::Symbolic)
    } else {
        ty.clone()
    }
}

impl Settings {
    /// Settings for one procedure: marker arguments override `defaults`.
    pub fn for_marker(marker: &Marker, defaults: &Settings, interner: &Interner) -> Settings {
        let resolve = |symbol: Option<SymbolUsize>, fallback: &str| {
            symbol
                .and_then(|symbol| interner.resolve(symbol))
                .unwrap_or(fallback)
                .to_string()
        };
        Settings {
            prefix: resolve(marker.prefix, &defaults.prefix),
            auto_prefix: resolve(marker.auto_prefix, &defaults.auto_prefix),
        }
    }
}

impl LoweringCtx<'_> {
    fn procedure(&self, def: Index) -> Result<Procedure, LoweringError> {
        let node = self.node(def)?;
        let NodeKind::Def {
            kind:
                DefKind::Function {
                    name,
                    params,
                    body,
                    return_type,
                    ..
                },
        } = &node.kind
        else {
            return Err(LoweringError::NotFound {
                what: format!("procedure {:?}", def.into_raw_parts()),
            });
        };
        Ok(Procedure {
            name: self.interner.resolve(*name).unwrap_or("<unknown>").to_string(),
            params: params.clone(),
            body: body.clone(),
            return_type: return_type.clone(),
            span: node.span,
        })
    }

    /// The `#[autograph]` marker on the procedure at `def`, if any.
    pub fn marker(&self, def: Index) -> Result<Option<Marker>, LoweringError> {
        match &self.node(def)?.kind {
            NodeKind::Def {
                kind: DefKind::Function { marker, .. },
            } => Ok(marker.clone()),
            _ => Err(LoweringError::NotFound {
                what: format!("procedure {:?}", def.into_raw_parts()),
            }),
        }
    }

    /// Fails when the wrapper and the auto procedure would share a name.
    pub fn check_prefixes(&self, def: Index, settings: &Settings) -> Result<(), LoweringError> {
        if settings.prefix != settings.auto_prefix {
            return Ok(());
        }
        let procedure = self.procedure(def)?;
        Err(LoweringError::PrefixCollision {
            name: format!("{}{}", settings.prefix, procedure.name),
            procedure: procedure.name,
            span: self.display(procedure.span),
        })
    }

    /// `{auto_prefix}{name}`: the lowered body over symbolic parameters.
    pub fn auto_procedure(&mut self, def: Index, settings: &Settings, options: &LowerOptions) -> Result<Index, LoweringError> {
        let procedure = self.procedure(def)?;
        let name = format!("{}{}", settings.auto_prefix, procedure.name);

        let params: Vec<Param> = procedure
            .params
            .iter()
            .map(|param| Param {
                ty: symbolic(&param.ty),
                ..param.clone()
            })
            .collect();

        let mut body = procedure.body;
        if options.implicit_else {
            body = implicit_else::synthesize(self.tree, &body);
        }
        if options.normalize_declarations {
            body = declarations::normalize(self.tree, &body);
        }
        if options.promote_literals {
            body = literals::promote(self.tree, &body);
        }
        let body = self.lower_body(&params, &body)?;

        info!(procedure = %procedure.name, generated = %name, "generated auto procedure");
        let name = self.interner.get_or_intern(name);
        Ok(self.push(Node::new(
            NodeKind::Def {
                kind: DefKind::Function {
                    name,
                    params,
                    body,
                    return_type: procedure.return_type.as_ref().map(symbolic),
                    marker: None,
                },
            },
            procedure.span,
        )))
    }

    /// `{prefix}{name}`: keeps the original signature, turns primitive
    /// arguments into placeholders and runs the auto procedure.
    pub fn wrapper_procedure(&mut self, def: Index, settings: &Settings) -> Result<Index, LoweringError> {
        let procedure = self.procedure(def)?;
        let span = procedure.span;
        let mut params = Vec::with_capacity(procedure.params.len());
        let mut body = Vec::new();
        let mut args = Vec::with_capacity(procedure.params.len());

        for param in &procedure.params {
            let var = self.symbols.declare(param.name, VarOrigin::Param, param.span);
            let binding = Binding::resolved(param.name, var);
            params.push(Param {
                var: Some(var),
                ..param.clone()
            });

            if !param.ty.is_primitive() {
                args.push(self.var_expr(binding, span));
                continue;
            }
            let placeholder_name = format!("{}{}", settings.auto_prefix, self.name_of(&binding));
            let placeholder = self.synthetic(&placeholder_name, SyntheticRole::Placeholder, span);
            let value = self.var_expr(binding, span);
            let value = self.push(Node::expr(
                ExprKind::Intrinsic {
                    op: Intrinsic::Placeholder,
                    args: vec![value],
                },
                span,
            ));
            body.push(self.push(Node::stmt(
                StmtKind::Let {
                    binding: placeholder,
                    type_annotation: None,
                    value,
                },
                span,
            )));
            args.push(self.var_expr(placeholder, span));
        }

        let auto_name = self.interner.get_or_intern(format!("{}{}", settings.auto_prefix, procedure.name));
        let call = self.push(Node::expr(ExprKind::Call { func: auto_name, args }, span));
        let run = self.push(Node::expr(
            ExprKind::Intrinsic {
                op: Intrinsic::Run,
                args: vec![call],
            },
            span,
        ));
        body.push(self.push(Node::stmt(StmtKind::Return { value: Some(run) }, span)));

        let name = format!("{}{}", settings.prefix, procedure.name);
        info!(procedure = %procedure.name, generated = %name, "generated wrapper");
        let name = self.interner.get_or_intern(name);
        Ok(self.push(Node::new(
            NodeKind::Def {
                kind: DefKind::Function {
                    name,
                    params,
                    body,
                    return_type: procedure.return_type,
                    marker: None,
                },
            },
            span,
        )))
    }
}

pub mod analysis;
pub mod autograph;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod passes;
pub mod rewrite;
pub mod runtime;
pub mod tokens;

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use string_interner::{StringInterner, backend::BucketBackend, symbol::SymbolUsize};
use tracing::{debug, info};

use analysis::{FunctionTable, SymbolTable, analysis_pass};
use error::CompileError;
use lexer::Lexer;
use lower::{LoweringCtx, LoweringError, LoweringWarning};
use parser::{
    Parser,
    node::{DefKind, Node, NodeKind},
};
use tokens::{Token, TokenKind};

pub type Interner = StringInterner<BucketBackend<SymbolUsize>>;

/// Naming prefixes of the two generated procedures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prepended to the wrapper's name.
    pub prefix: String,
    /// Prepended to the lowered procedure's name and to its placeholder locals.
    pub auto_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            auto_prefix: "_".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerOptions {
    /// Give every `if` without an `else` an empty one instead of failing.
    pub implicit_else: bool,
    /// Rewrite `let x: T = e;` to `let x = e;` before lowering.
    pub normalize_declarations: bool,
    /// Wrap directly assigned numeric literals in `graph_const(..)`.
    pub promote_literals: bool,
    /// Lower every procedure, marked or not.
    pub all_procedures: bool,
    /// Used where a marker leaves a prefix out.
    pub default_settings: Settings,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            implicit_else: false,
            normalize_declarations: true,
            promote_literals: true,
            all_procedures: false,
            default_settings: Settings::default(),
        }
    }
}

/// A parsed and resolved program.
pub struct Frontend {
    pub interner: Interner,
    pub tree: Arena<Node>,
    pub root: Node,
    pub symbols: SymbolTable,
    pub functions: FunctionTable,
}

pub struct LoweredProgram {
    pub interner: Interner,
    pub tree: Arena<Node>,
    pub symbols: SymbolTable,
    /// The program as parsed. Its nodes are still in `tree`.
    pub original: Node,
    pub lowered: Node,
    /// `lowered` rendered as source text.
    pub source: String,
    /// For every original procedure, the procedure to call in `lowered` instead.
    pub entry_points: HashMap<String, String>,
    /// Constructs that lowered but may behave differently once deferred.
    pub warnings: Vec<LoweringWarning>,
}

pub fn read_source(path: &std::path::Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn tokenize(source: &str, file: &str, interner: &mut Interner) -> Result<Vec<Token>, CompileError> {
    let file = interner.get_or_intern(file);
    let mut lexer = Lexer::new(interner, file);
    lexer.tokenize(source.chars().collect());
    if !lexer.errors.is_empty() {
        return Err(CompileError::Lex(lexer.errors));
    }
    Ok(lexer.tokens)
}

/// Lexes, parses and resolves `source`.
pub fn parse(source: &str, file: &str) -> Result<Frontend, CompileError> {
    let mut interner = Interner::new();
    let tokens = tokenize(source, file, &mut interner)?;
    debug!(tokens = tokens.len(), "lexed");

    let (root, mut tree) = {
        let mut parser = Parser::new(tokens, &interner);
        let root = parser.parse();
        if !parser.parse_errors.is_empty() {
            return Err(CompileError::Parse(parser.parse_errors));
        }
        (root, parser.tree)
    };

    let mut symbols = SymbolTable::new();
    let (functions, diagnostics) = analysis_pass(&root, &mut tree, &interner, &mut symbols);
    if !diagnostics.is_empty() {
        return Err(CompileError::Analysis(diagnostics));
    }
    debug!(nodes = tree.len(), variables = symbols.len(), "resolved");

    Ok(Frontend {
        interner,
        tree,
        root,
        symbols,
        functions,
    })
}

pub fn lower_source(source: &str, file: &str, options: &LowerOptions) -> Result<LoweredProgram, CompileError> {
    lower_program(parse(source, file)?, options)
}

/// Replaces every marked procedure with its wrapper and its lowered
/// counterpart. Other procedures are kept as they are.
pub fn lower_program(frontend: Frontend, options: &LowerOptions) -> Result<LoweredProgram, CompileError> {
    let Frontend {
        mut interner,
        mut tree,
        root,
        mut symbols,
        ..
    } = frontend;
    let defs = match &root.kind {
        NodeKind::Root { defs } => defs.clone(),
        _ => Vec::new(),
    };

    let mut ctx = LoweringCtx::new(&mut tree, &mut symbols, &mut interner);
    let mut lowered_defs = Vec::with_capacity(defs.len() * 2);
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut entry_points = HashMap::new();
    let mut errors = Vec::new();

    for def in defs {
        match lower_def(&mut ctx, def, options) {
            Ok(generated) => {
                if let (Ok(original), Some(Ok(entry))) = (def_name(&ctx, def), generated.first().map(|&idx| def_name(&ctx, idx))) {
                    entry_points.insert(original, entry);
                }
                for idx in generated {
                    if let Err(error) = claim_name(&ctx, idx, def, &mut owners) {
                        errors.push(error);
                    }
                    lowered_defs.push(idx);
                }
            }
            Err(error) => errors.push(error),
        }
    }
    if !errors.is_empty() {
        return Err(CompileError::Lowering(errors));
    }
    let warnings = std::mem::take(&mut ctx.warnings);

    let lowered = Node::new(NodeKind::Root { defs: lowered_defs }, root.span);
    let source = emit::render(&lowered, &tree, &interner);
    info!(procedures = owners.len(), "lowered program");

    Ok(LoweredProgram {
        interner,
        tree,
        symbols,
        original: root,
        lowered,
        source,
        entry_points,
        warnings,
    })
}

/// The definitions that stand in for `def` in the lowered program, the
/// callable one first.
fn lower_def(ctx: &mut LoweringCtx<'_>, def: Index, options: &LowerOptions) -> Result<Vec<Index>, LoweringError> {
    let marker = ctx.marker(def)?;
    if marker.is_none() && !options.all_procedures {
        return Ok(vec![def]);
    }
    let settings = match &marker {
        Some(marker) => Settings::for_marker(marker, &options.default_settings, &*ctx.interner),
        None => options.default_settings.clone(),
    };
    ctx.check_prefixes(def, &settings)?;
    let wrapper = ctx.wrapper_procedure(def, &settings)?;
    let auto = ctx.auto_procedure(def, &settings, options)?;
    Ok(vec![wrapper, auto])
}

fn def_name(ctx: &LoweringCtx<'_>, idx: Index) -> Result<String, LoweringError> {
    match &ctx.node(idx)?.kind {
        NodeKind::Def {
            kind: DefKind::Function { name, .. },
        } => Ok(ctx.interner.resolve(*name).unwrap_or("<unknown>").to_string()),
        _ => Err(LoweringError::NotFound { what: "procedure".to_string() }),
    }
}

/// Records that the procedure at `idx` came from `source`, failing if another
/// procedure already has its name.
fn claim_name(ctx: &LoweringCtx<'_>, idx: Index, source: Index, owners: &mut HashMap<String, String>) -> Result<(), LoweringError> {
    let name = def_name(ctx, idx)?;
    let procedure = def_name(ctx, source)?;
    if owners.contains_key(&name) {
        return Err(LoweringError::PrefixCollision {
            procedure,
            name,
            span: ctx.display(ctx.node(idx)?.span),
        });
    }
    owners.insert(name, procedure);
    Ok(())
}

/// One line per token, as `line:col kind`.
pub fn token_listing(tokens: &[Token], interner: &Interner) -> String {
    tokens
        .iter()
        .map(|token| {
            let kind = match token.kind {
                TokenKind::Identifier(symbol) => format!("Identifier({})", interner.resolve(symbol).unwrap_or("<unknown>")),
                TokenKind::StringLiteral(symbol) => format!("StringLiteral({:?})", interner.resolve(symbol).unwrap_or("")),
                kind => format!("{:?}", kind),
            };
            format!("{}:{} {}", token.span.start.0, token.span.start.1, kind)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

use autograph::compiler::{
    self, LowerOptions, LoweredProgram, Settings,
    error::{CompileError, print_errors},
    runtime::{Interpreter, Value},
};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autograph")]
#[command(about = "Rewrites if/else into lazily evaluated graph construction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// -v for debug logs, -vv for trace logs. Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "lower", about = "lower <file> | Print the lowered program")]
    Lower {
        file: PathBuf,
        #[command(flatten)]
        lowering: LoweringArgs,
    },
    #[command(name = "run", about = "run <file> --entry NAME [ARGS...] | Evaluate the original and the lowered program")]
    Run {
        file: PathBuf,
        #[arg(long)]
        entry: String,
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
        #[command(flatten)]
        lowering: LoweringArgs,
    },
    #[command(name = "tokens", about = "tokens <file> | Print the token stream")]
    Tokens { file: PathBuf },
    #[command(name = "tree", about = "tree <file> | Print the resolved syntax tree")]
    Tree { file: PathBuf },
}

#[derive(Args)]
struct LoweringArgs {
    /// Treat an if without else as having an empty else
    #[arg(long)]
    implicit_else: bool,
    /// Lower every procedure, not only #[autograph] ones
    #[arg(long)]
    all: bool,
    /// Wrapper name prefix when the marker does not set one
    #[arg(long, default_value = "")]
    prefix: String,
    /// Lowered procedure name prefix when the marker does not set one
    #[arg(long, default_value = "_")]
    auto_prefix: String,
    /// Keep `let x: T` declarations as written
    #[arg(long)]
    keep_declarations: bool,
    /// Do not wrap assigned literals in graph_const
    #[arg(long)]
    no_promote: bool,
}

impl From<LoweringArgs> for LowerOptions {
    fn from(args: LoweringArgs) -> Self {
        LowerOptions {
            implicit_else: args.implicit_else,
            normalize_declarations: !args.keep_declarations,
            promote_literals: !args.no_promote,
            all_procedures: args.all,
            default_settings: Settings {
                prefix: args.prefix,
                auto_prefix: args.auto_prefix,
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn lower(file: &Path, options: &LowerOptions) -> Result<String, CompileError> {
    let source = compiler::read_source(file)?;
    compiler::lower_source(&source, &file.display().to_string(), options)
        .map(|program| program.source)
        .inspect_err(|err| print_errors(err, Some(&source)))
}

fn run(file: &Path, entry: &str, args: &[String], options: &LowerOptions) -> Result<bool, CompileError> {
    let source = compiler::read_source(file)?;
    let args = args.iter().map(|arg| arg.parse::<Value>()).collect::<Result<Vec<_>, _>>()?;

    let program: LoweredProgram =
        compiler::lower_source(&source, &file.display().to_string(), options).inspect_err(|err| print_errors(err, Some(&source)))?;
    let lowered_entry = program.entry_points.get(entry).map(String::as_str).unwrap_or(entry);

    let mut original = Interpreter::new(&program.original, &program.tree, &program.interner);
    let expected = original.call(entry, args.clone())?;
    let mut lowered = Interpreter::new(&program.lowered, &program.tree, &program.interner);
    let actual = lowered.call(lowered_entry, args)?;

    let stats = lowered.stats();
    println!("{} {}", "original:".bold(), expected);
    println!(
        "{} {} ({} select(s), {} deferred bod{} invoked)",
        "lowered: ".bold(),
        actual,
        stats.selects,
        stats.deferred_calls,
        if stats.deferred_calls == 1 { "y" } else { "ies" }
    );
    let agree = expected == actual;
    if agree {
        println!("{}", "results agree".green());
    } else {
        println!("{}", "results differ".red().bold());
    }
    Ok(agree)
}

fn tokens(file: &Path) -> Result<String, CompileError> {
    let source = compiler::read_source(file)?;
    let mut interner = compiler::Interner::new();
    let tokens = compiler::tokenize(&source, &file.display().to_string(), &mut interner).inspect_err(|err| print_errors(err, Some(&source)))?;
    Ok(compiler::token_listing(&tokens, &interner))
}

fn tree(file: &Path) -> Result<String, CompileError> {
    let source = compiler::read_source(file)?;
    let frontend = compiler::parse(&source, &file.display().to_string()).inspect_err(|err| print_errors(err, Some(&source)))?;
    Ok(frontend.root.to_json_like_string(&frontend.tree, &frontend.interner))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Lower { file, lowering } => lower(&file, &lowering.into()).map(|out| {
            print!("{out}");
            true
        }),
        Commands::Run {
            file,
            entry,
            args,
            lowering,
        } => run(&file, &entry, &args, &lowering.into()),
        Commands::Tokens { file } => tokens(&file).map(|out| {
            println!("{out}");
            true
        }),
        Commands::Tree { file } => tree(&file).map(|out| {
            println!("{out}");
            true
        }),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            if matches!(err, CompileError::Io { .. } | CompileError::Runtime(_)) {
                print_errors(&err, None);
            }
            ExitCode::FAILURE
        }
    }
}

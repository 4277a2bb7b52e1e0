use clap::{Parser, Subcommand, ValueEnum};
use declcall_compiler::{Compilation, EvaluationContext, LambdaCallPolicy, ResolverOptions};
use declcall_lexer::lex;
use declcall_model::TargetPointer;
use declcall_parser::{parse_translation_unit, Parser as DeclcallParser};
use declcall_reporting::DiagnosticContext;
use std::fs;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "declcall")]
#[command(about = "Call-target resolution for a modeled declcall operator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show the syntax tree while parsing
    #[arg(long, global = true)]
    tree: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check declaration files
    Check {
        /// Declaration files to check
        files: Vec<String>,
    },
    /// Parse declaration files and show the syntax tree
    Parse {
        /// Declaration files to parse
        files: Vec<String>,
    },
    /// Resolve a declcall operand against declaration files
    Resolve {
        /// Declaration files the operand is resolved against
        files: Vec<String>,

        /// The operand expression, as it would appear inside declcall(...)
        #[arg(short, long)]
        operand: String,

        /// Resolve in a type-only context, as under decltype
        #[arg(long)]
        type_only: bool,

        /// How calls through immediately invoked lambdas are treated
        #[arg(long, value_enum, default_value_t = LambdaCalls::Reject)]
        lambda_calls: LambdaCalls,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LambdaCalls {
    /// Reject the lambda call outright
    Reject,
    /// Resolve the outer call through the lambda's returned value
    ResolveResult,
}

impl From<LambdaCalls> for LambdaCallPolicy {
    fn from(value: LambdaCalls) -> Self {
        match value {
            LambdaCalls::Reject => LambdaCallPolicy::Reject,
            LambdaCalls::ResolveResult => LambdaCallPolicy::ResolveResult,
        }
    }
}

fn compile(files: &[String], options: ResolverOptions, verbose: bool) -> Option<Compilation> {
    if files.is_empty() {
        eprintln!("error: no input files");
        return None;
    }

    let mut builder = Compilation::builder().with_resolver_options(options);
    for file in files {
        if verbose {
            eprintln!("  Reading {}", file);
        }
        builder = match builder.add_file(file) {
            Ok(builder) => builder,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", file, e);
                return None;
            }
        };
    }

    Some(builder.build())
}

fn run_check(files: &[String], verbose: bool) -> ExitCode {
    let Some(compilation) = compile(files, ResolverOptions::default(), verbose) else {
        return ExitCode::from(1);
    };

    if compilation.has_errors() {
        compilation.diagnostics().emit().ok();
        return ExitCode::from(1);
    }

    if verbose {
        let program = compilation.program();
        eprintln!(
            "  {} file(s), {} class(es), {} function(s)",
            compilation.source_files().len(),
            program.classes().count(),
            program.functions().count(),
        );
        eprintln!("  No errors found.");
    }
    ExitCode::SUCCESS
}

fn run_parse(files: &[String], show_tree: bool) -> ExitCode {
    if files.is_empty() {
        eprintln!("error: no input files");
        return ExitCode::from(1);
    }

    let mut has_errors = false;

    for file in files {
        let content = match fs::read_to_string(file) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", file, e);
                has_errors = true;
                continue;
            }
        };

        let tokens: Vec<_> = lex(&content)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect();

        let result = DeclcallParser::parse(&content, tokens.into_iter(), parse_translation_unit);

        println!("=== {} ===", file);

        if !result.errors.is_empty() {
            has_errors = true;
            for error in &result.errors {
                println!("error: {}", error.message);
            }
        } else {
            println!("Parsed successfully.");
        }

        if show_tree {
            println!("\n{:#?}", result.tree);
        }

        println!();
    }

    if has_errors {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_resolve(
    files: &[String],
    operand: &str,
    type_only: bool,
    lambda_calls: LambdaCalls,
    verbose: bool,
) -> ExitCode {
    let options = ResolverOptions {
        lambda_calls: lambda_calls.into(),
    };
    let Some(compilation) = compile(files, options, verbose) else {
        return ExitCode::from(1);
    };

    if compilation.has_errors() {
        compilation.diagnostics().emit().ok();
        return ExitCode::from(1);
    }

    let context = if type_only {
        EvaluationContext::TypeOnly
    } else {
        EvaluationContext::ConstantExpression
    };

    match compilation.resolve_operand(operand, context) {
        Ok(target) => {
            let program = compilation.program();
            println!("declcall({}) resolves", operand);
            println!("  type: {}", target.ty.display(program));
            match &target.pointer {
                Some(pointer @ TargetPointer::Member { function, .. }) => {
                    println!(
                        "  target: {}{}",
                        program.function(*function).qualified_name(program),
                        if pointer.is_devirtualized() {
                            " (devirtualized)"
                        } else {
                            ""
                        }
                    );
                }
                Some(TargetPointer::Function { function }) => {
                    println!(
                        "  target: {}",
                        program.function(*function).qualified_name(program)
                    );
                }
                None => println!("  target: value-dependent (type-only)"),
            }
            ExitCode::SUCCESS
        }
        Err(diagnosis) => {
            println!("declcall({}) is rejected: {:?}", operand, diagnosis.kind());
            let mut diagnostics = DiagnosticContext::new();
            let file_id = diagnostics.add_file("<operand>".to_string(), operand.to_string());
            diagnostics.throw(&diagnosis, file_id);
            diagnostics.emit().ok();
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { files } => run_check(&files, cli.verbose),
        Commands::Parse { files } => run_parse(&files, cli.tree),
        Commands::Resolve {
            files,
            operand,
            type_only,
            lambda_calls,
        } => run_resolve(&files, &operand, type_only, lambda_calls, cli.verbose),
    }
}

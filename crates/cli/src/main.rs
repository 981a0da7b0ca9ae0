use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use thrift_ast_core::{DuplicateFieldIds, ParseOptions, SubjectKind, ThriftAst, ThriftSyntaxError};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Thrift IDL parser.
#[derive(Parser)]
#[command(name = "thrift-ast", version, about = "Thrift IDL to AST parser")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log parser progress to stderr (overrides RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    /// Accept struct-like blocks that repeat a field id
    #[arg(long, global = true)]
    allow_duplicate_ids: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .thrift file and print its AST as JSON
    Parse {
        /// Path to the .thrift source file
        file: PathBuf,
    },

    /// Check that a .thrift file parses
    Check {
        /// Path to the .thrift source file
        file: PathBuf,
    },

    /// List the includes of a .thrift file with their module names
    Includes {
        /// Path to the .thrift source file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ParseOptions::new().duplicate_field_ids(if cli.allow_duplicate_ids {
        DuplicateFieldIds::Keep
    } else {
        DuplicateFieldIds::Reject
    });

    match cli.command {
        Commands::Parse { file } => cmd_parse(&file, options, cli.output, cli.quiet),
        Commands::Check { file } => cmd_check(&file, options, cli.output, cli.quiet),
        Commands::Includes { file } => cmd_includes(&file, options, cli.output, cli.quiet),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read and parse `file`, exiting with status 1 on any failure.
fn load(file: &Path, options: ParseOptions, output: OutputFormat, quiet: bool) -> ThriftAst {
    let src = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    tracing::debug!(file = %file.display(), "parsing");
    match thrift_ast_core::parse_with(&src, options) {
        Ok(ast) => ast,
        Err(e) => {
            report_syntax_error(file, &e, output, quiet);
            process::exit(1);
        }
    }
}

fn cmd_parse(file: &Path, options: ParseOptions, output: OutputFormat, quiet: bool) {
    let ast = load(file, options, output, quiet);
    let json = thrift_ast_core::to_json(&ast);
    let pretty = serde_json::to_string_pretty(&json)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

fn cmd_check(file: &Path, options: ParseOptions, output: OutputFormat, quiet: bool) {
    let ast = load(file, options, output, quiet);
    match output {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "ok": true,
                "declarations": ast.len(),
            });
            println!("{}", summary);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("ok: {} declarations", ast.len());
            }
        }
    }
}

fn cmd_includes(file: &Path, options: ParseOptions, output: OutputFormat, quiet: bool) {
    let ast = load(file, options, output, quiet);
    let includes: Vec<(&str, &str)> = ast
        .get(SubjectKind::Include)
        .map(|m| {
            m.values()
                .filter_map(|s| match s {
                    thrift_ast_core::Subject::Include(inc) => {
                        Some((inc.module.as_str(), inc.path.as_str()))
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    match output {
        OutputFormat::Json => {
            let list: Vec<serde_json::Value> = includes
                .iter()
                .map(|(module, path)| serde_json::json!({ "module": module, "path": path }))
                .collect();
            let pretty = serde_json::to_string_pretty(&list)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for (module, path) in includes {
                println!("{}\t{}", module, path);
            }
        }
    }
}

fn report_syntax_error(file: &Path, e: &ThriftSyntaxError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}:{}: {}", file.display(), e.line, e.message);
                eprintln!("  | {}", e.context.lines().next().unwrap_or(""));
            }
        }
    }
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", msg);
            }
        }
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

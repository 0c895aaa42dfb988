// Quartz CLI

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use quartz::{Context, ParseError, ParserConfig, Severity, dump_tokens, dump_tree, parse_tokens, tokenize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quartz", version, about = "Tokenize, parse and evaluate Quartz sources")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token table of a source file
    Tokens { file: PathBuf },
    /// Parse a source file and print its tree
    Tree {
        file: PathBuf,
        #[command(flatten)]
        options: ParseOptions,
    },
    /// Parse a source file and report every diagnostic
    Check {
        file: PathBuf,
        #[command(flatten)]
        options: ParseOptions,
    },
}

#[derive(Args, Debug)]
struct ParseOptions {
    /// Allow calls to functions declared later in the file
    #[arg(long)]
    forward_references: bool,
    /// Accept non-boolean `if`/`while` conditions
    #[arg(long)]
    permissive_conditions: bool,
    /// Deepest allowed nesting of blocks and parentheses
    #[arg(long, default_value_t = ParserConfig::default().max_depth)]
    max_depth: usize,
}

impl From<&ParseOptions> for ParserConfig {
    fn from(options: &ParseOptions) -> Self {
        ParserConfig {
            forward_references: options.forward_references,
            boolean_conditions: !options.permissive_conditions,
            max_depth: options.max_depth,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Tokens { file } => {
            let source = read_source(file)?;
            let (dump, errors) = dump_tokens(&source);
            print!("{dump}");
            for error in &errors {
                eprintln!("{} {} at line {}", style("!").yellow().bold(), error, error.line());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tree { file, options } => {
            let source = read_source(file)?;
            run_parse(&source, options.into(), true)
        }
        Command::Check { file, options } => {
            let source = read_source(file)?;
            run_parse(&source, options.into(), false)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "quartz=warn",
        1 => "quartz=debug",
        _ => "quartz=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_parse(source: &str, config: ParserConfig, print_tree: bool) -> anyhow::Result<ExitCode> {
    let progress = ProgressBar::new(2);
    progress.set_style(
        ProgressStyle::with_template("PIPELINE [{bar:40.green}] {msg}")?.progress_chars("━━-"),
    );

    progress.set_message("Lexer");
    let (tokens, lex_errors) = tokenize(source);
    tracing::debug!(tokens = tokens.len(), "lexed");
    progress.inc(1);

    progress.set_message("Parser");
    let mut ctx = Context::new();
    let outcome = parse_tokens(tokens, &lex_errors, &mut ctx, &config);
    progress.inc(1);
    progress.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(fatal) => {
            eprintln!("{} {}", style("✘ Fatal:").red().bold(), fatal);
            return Ok(ExitCode::FAILURE);
        }
    };

    let warnings: Vec<&ParseError> = result.warnings().collect();
    if !warnings.is_empty() {
        print_diagnostics(Severity::Warning, "Lexer", &warnings);
    }
    let errors: Vec<&ParseError> = result.errors.iter().filter(|e| e.is_error()).collect();

    match &result.result {
        Some(program) => {
            if print_tree {
                print!("{}", dump_tree(program));
            } else {
                println!("{} Check passed successfully!", style("✔").green().bold());
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            print_diagnostics(Severity::Error, "Parsing", &errors);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_diagnostics(severity: Severity, phase: &str, diagnostics: &[&ParseError]) {
    let header = match severity {
        Severity::Error => style(format!("✘ Stage: {phase}")).red().bold(),
        Severity::Warning => style(format!("! Stage: {phase}")).yellow().bold(),
    };
    eprintln!("\n{header}");
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
        if let Some(hint) = &diagnostic.hint {
            eprintln!("{} {}", style("Hint:").cyan().bold(), style(hint).cyan());
        }
    }
}

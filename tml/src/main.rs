//! TML Interpreter CLI

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;

use tml::interp::{self, Status, Tape};
use tml::resolver::{fold_files, SourceFile, SourceMap};
use tml::types::SymbolTable;

#[derive(Parser)]
#[command(name = "tml", version, about = "TML - Tape Machine Language interpreter")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one or more TML files in order
    Run {
        /// Source files, later files see earlier declarations
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Initial tape contents
        #[arg(short, long, default_value = "")]
        tape: String,
        /// Initial head position
        #[arg(
            long,
            default_value_t = 0,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(-HEAD_LIMIT..=HEAD_LIMIT)
        )]
        head: i64,
    },
    /// Parse and scope-check files without running them
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start an interactive session
    Repl {
        /// Initial tape contents
        #[arg(short, long, default_value = "")]
        tape: String,
    },
}

/// Exit code for programs that fail to compile or abort at run time
const EXIT_ERROR: u8 = 2;

/// Largest `--head` distance from cell 0; the tape is filled out to the head
const HEAD_LIMIT: i64 = 1 << 20;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run { files, tape, head } => run_files(&files, Tape::with_head(&tape, head)),
        Command::Check { files } => check_files(&files),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl { tape } => start_repl(Tape::new(&tape)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialise logging: {e}");
    }
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|path| SourceFile::read(path).map_err(Into::into))
        .collect()
}

fn run_files(paths: &[PathBuf], tape: Tape) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let sources = read_sources(paths)?;
    let program = match fold_files(SymbolTable::new(), &sources) {
        Ok(program) => program,
        Err(e) => {
            e.report();
            return Ok(ExitCode::from(EXIT_ERROR));
        }
    };

    let config = match interp::run(&program, tape) {
        Ok(config) => config,
        Err(e) => {
            sources.into_iter().collect::<SourceMap>().report(&e);
            return Ok(ExitCode::from(EXIT_ERROR));
        }
    };

    for line in &config.output {
        println!("{line}");
    }
    println!("{}", config.tape);
    println!("{}", config.tape.head_marker());
    println!("{}", config.status);

    Ok(match config.status {
        Status::Rejected => ExitCode::FAILURE,
        Status::Accepted | Status::Running => ExitCode::SUCCESS,
    })
}

fn check_files(paths: &[PathBuf]) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let sources = read_sources(paths)?;
    if let Err(e) = fold_files(SymbolTable::new(), &sources) {
        e.report();
        return Ok(ExitCode::from(EXIT_ERROR));
    }
    for source in &sources {
        println!("✓ {} checks successfully", source.name);
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_file(path: &PathBuf) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let source = SourceFile::read(path)?;
    match fold_files(SymbolTable::new(), std::slice::from_ref(&source)) {
        Ok(program) => {
            println!("{}", serde_json::to_string_pretty(&program)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            e.report();
            Ok(ExitCode::from(EXIT_ERROR))
        }
    }
}

fn tokenize_file(path: &PathBuf) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let source = SourceFile::read(path)?;

    let tokens = tml::lexer::tokenize(&source.text)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }

    Ok(ExitCode::SUCCESS)
}

fn start_repl(tape: Tape) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut repl = tml::repl::Repl::new(tape)?;
    repl.run()?;
    Ok(ExitCode::SUCCESS)
}

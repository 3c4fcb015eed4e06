//! REPL (Read-Eval-Print Loop) for TML
//!
//! One symbol table and one machine configuration live for the whole
//! session, so declarations and tape edits made on one line are visible on
//! the next. A line that fails to parse or aborts at run time leaves both
//! untouched.

use crate::error::{report_error, CompileError};
use crate::interp::{evaluate, Configuration, RuntimeError, Status, Tape};
use crate::lexer::{tokenize, Token};
use crate::parse_source_at;
use crate::resolver::{SourceFile, SourceMap};
use crate::types::SymbolTable;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = ". ";
const HISTORY_FILE: &str = ".tml_history";

/// Result of submitting one input to a [`Session`]
#[derive(Debug, PartialEq)]
pub enum Submission {
    /// Ran to completion; `output` holds only the lines this input printed
    Ran { output: Vec<String>, status: Status },
    Compile(CompileError),
    Runtime(RuntimeError),
}

/// Interpreter state carried between REPL inputs
#[derive(Debug, Clone)]
pub struct Session {
    initial: Tape,
    table: SymbolTable,
    config: Configuration,
    /// Every input that parsed, for locating runtime errors
    sources: SourceMap,
}

impl Session {
    pub fn new(tape: Tape) -> Self {
        Session {
            initial: tape.clone(),
            table: SymbolTable::new(),
            config: Configuration::new(tape),
            sources: SourceMap::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Forget all declarations and restore the initial tape
    pub fn reset(&mut self) {
        *self = Session::new(self.initial.clone());
    }

    /// Parse and run `input` on top of the current state
    pub fn submit(&mut self, input: &str) -> Submission {
        let base = self.sources.next_base();
        let (program, table) = match parse_source_at(input, base, self.table.clone()) {
            Ok(parsed) => parsed,
            Err(e) => return Submission::Compile(e),
        };
        let entry = self.sources.files_added() + 1;
        self.sources.add(SourceFile::new(format!("<repl:{entry}>"), input));

        let printed = self.config.output.len();
        match evaluate(&program, self.config.clone()) {
            Ok(config) => {
                let output = config.output[printed..].to_vec();
                let status = config.status;
                self.table = table;
                self.config = config;
                Submission::Ran { output, status }
            }
            Err(e) => Submission::Runtime(e),
        }
    }
}

/// Whether `input` has more `{` than `}` and so needs another line
fn needs_more_input(input: &str) -> bool {
    let Ok(tokens) = tokenize(input) else {
        return false;
    };
    let depth = tokens.iter().fold(0i64, |depth, (tok, _)| match tok {
        Token::LBrace => depth + 1,
        Token::RBrace => depth - 1,
        _ => depth,
    });
    depth > 0
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL over `tape`
    pub fn new(tape: Tape) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(tape),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("TML REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        let mut pending = String::new();
        loop {
            let prompt = if pending.is_empty() {
                PROMPT
            } else {
                CONTINUATION_PROMPT
            };
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if pending.is_empty() {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        let _ = self.editor.add_history_entry(trimmed);
                        if trimmed.starts_with(':') {
                            if self.handle_command(trimmed) {
                                break;
                            }
                            continue;
                        }
                    } else {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }

                    pending.push_str(&line);
                    pending.push('\n');
                    if needs_more_input(&pending) {
                        continue;
                    }
                    let input = std::mem::take(&mut pending);
                    self.eval_input(&input);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    pending.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :)
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                print_help();
                false
            }
            ":tape" | ":t" => {
                let tape = &self.session.config().tape;
                println!("{tape}");
                println!("{}", tape.head_marker());
                println!("head at {}, {}", tape.head(), self.session.config().status);
                false
            }
            ":reset" => {
                self.session.reset();
                println!("Session reset.");
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn eval_input(&mut self, input: &str) {
        let was_halted = self.session.config().is_halted();
        match self.session.submit(input) {
            Submission::Ran { output, status } => {
                for line in output {
                    println!("{line}");
                }
                if status != Status::Running {
                    if was_halted {
                        println!("(machine already halted: {status}; :reset to start over)");
                    } else {
                        println!("{status}");
                    }
                }
            }
            Submission::Compile(e) => report_error("<repl>", input, &e),
            Submission::Runtime(e) => self.session.sources().report(&e),
        }
    }
}

fn print_help() {
    println!("TML REPL Commands:");
    println!("  :help, :h, :?   Show this help");
    println!("  :quit, :q       Exit the REPL");
    println!("  :tape, :t       Show the tape and head position");
    println!("  :reset          Forget declarations and restore the initial tape");
    println!("  :clear          Clear the screen");
    println!();
    println!("You can enter any statements, e.g.:");
    println!("  write '1'");
    println!("  let mark = '#'");
    println!("  func stamp(s) {{ write s }}");
    println!("  while not (read == space) {{ right }}");
}

fn dirs_home() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

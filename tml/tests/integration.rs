//! Integration tests for the TML interpreter
//!
//! Tests the full pipeline:
//! - Lexing and scope-checked parsing
//! - Evaluation over the tape
//! - Multi-file loading
//! - Error kinds at compile and run time

use tml::ast::Stm;
use tml::interp::{self, Configuration, RuntimeError, Status, Tape};
use tml::resolver::{fold_files, SourceFile, SourceMap};
use tml::types::SymbolTable;
use tml::{CompileError, Span};

/// Helper to parse and run a single program, without the implicit `accept`
fn run_program(source: &str, tape: Tape) -> Configuration {
    let (program, _) = tml::parse_source(source, SymbolTable::new()).expect("Parse should succeed");
    interp::run(&program, tape).expect("Run should succeed")
}

/// Helper to load files the way the CLI does and run them
fn run_files(files: &[(&str, &str)], tape: Tape) -> Configuration {
    let sources: Vec<SourceFile> = files
        .iter()
        .map(|(name, text)| SourceFile::new(*name, *text))
        .collect();
    let program = fold_files(SymbolTable::new(), &sources).expect("Load should succeed");
    interp::run(&program, tape).expect("Run should succeed")
}

/// Helper to get the compile error for a program
fn compile_error(source: &str) -> CompileError {
    tml::parse_source(source, SymbolTable::new()).expect_err("Parse should fail")
}

// ============================================
// End-to-end scenarios
// ============================================

#[test]
fn test_move_right_then_left() {
    let config = run_program("right\nleft", Tape::with_head("abc", 1));
    assert_eq!(config.tape.head(), 1);
    assert_eq!(config.tape.contents(), "abc");
    assert_eq!(config.status, Status::Running);
}

#[test]
fn test_write_literal() {
    let config = run_program("write '2'", Tape::with_head("abc", 1));
    assert_eq!(config.tape.contents(), "a2c");
}

#[test]
fn test_if_else_branches() {
    let source = "if True { write '1' } else { write '2' }";
    assert_eq!(
        run_program(source, Tape::with_head("abc", 1)).tape.contents(),
        "a1c"
    );
    let source = "if False { write '1' } else { write '2' }";
    assert_eq!(
        run_program(source, Tape::with_head("abc", 1)).tape.contents(),
        "a2c"
    );
}

#[test]
fn test_scan_to_marker() {
    let config = run_program("while not (read == '#') { right }", Tape::new("Ab5#"));
    assert_eq!(config.tape.head(), 3);
    assert_eq!(config.tape.read(), '#');
}

#[test]
fn test_variable_in_condition() {
    let config = run_program("let x = '1'\nif x == '1' { write '#' }", Tape::new("abc"));
    assert_eq!(config.tape.contents(), "#bc");
}

#[test]
fn test_undeclared_call_is_runtime_error_when_unchecked() {
    // Bypasses the parser, which would reject this program
    let result = interp::run(&Stm::call("f", vec![]), Tape::new("abc"));
    assert_eq!(result, Err(RuntimeError::undefined_function("f", Span::default())));
}

#[test]
fn test_undeclared_call_is_compile_error() {
    match compile_error("f") {
        CompileError::UndeclaredIdentifier { name, .. } => assert_eq!(name, "f"),
        other => panic!("expected UndeclaredIdentifier, got {other:?}"),
    }
}

// ============================================
// Whole programs
// ============================================

#[test]
fn test_binary_increment() {
    let source = r#"
// walk to the last digit
while not (read == space) {
  right
}
left

// propagate the carry
while read == '1' {
  write '0'
  left
}
write '1'
print "done"
accept
"#;
    let config = run_program(source, Tape::new("1011"));
    assert_eq!(config.tape.contents(), "1100 ");
    assert_eq!(config.status, Status::Accepted);
    assert_eq!(config.output, vec!["done".to_string()]);
}

#[test]
fn test_increment_grows_left() {
    let source = "while not (read == space) { right }\nleft\nwhile read == '1' {\n  write '0'\n  left\n}\nwrite '1'";
    let config = run_program(source, Tape::new("11"));
    assert_eq!(config.tape.contents(), "100 ");
    assert_eq!(config.tape.head(), -1);
    assert_eq!(config.tape.start(), -1);
}

#[test]
fn test_palindrome_checker() {
    let source = r#"
func to_end {
  while not (read == space) { right }
  left
}
func to_start {
  while not (read == space) { left }
  right
}
while not (read == space) {
  let first = read
  write space
  right
  to_end
  if read == space {
    accept
  } else if read == first {
    write space
    left
    to_start
  } else {
    reject
  }
}
accept
"#;
    assert_eq!(run_program(source, Tape::new("abcba")).status, Status::Accepted);
    assert_eq!(run_program(source, Tape::new("abca")).status, Status::Rejected);
    assert_eq!(run_program(source, Tape::new("")).status, Status::Accepted);
}

#[test]
fn test_recursive_function() {
    let source = "func mark_rest {\n  if not (read == space) {\n    write 'x'\n    right\n    mark_rest\n  }\n}\nmark_rest";
    let config = run_program(source, Tape::new("abcd"));
    assert_eq!(config.tape.contents(), "xxxx ");
}

#[test]
fn test_function_sees_caller_variables() {
    let source = r#"
let mark = '#'
func stamp {
  write mark
}
if True {
  let mark = '!'
  stamp
}
right
stamp
"#;
    // The call inside the `if` runs under the caller's binding of `mark`
    let config = run_program(source, Tape::new("ab"));
    assert_eq!(config.tape.contents(), "!#");
}

#[test]
fn test_call_uses_declaration_visible_at_definition() {
    // `g` inside `f` is the one-parameter function, even when called from
    // a block that declares another `g`
    let source = "func g(a) { write a }\nfunc f { g('x') }\nif True {\n  func g { left }\n  f\n}";
    let config = run_program(source, Tape::new("abc"));
    assert_eq!(config.tape.contents(), "xbc");
    assert_eq!(config.tape.head(), 0);
}

#[test]
fn test_shadowing_function_is_used_in_its_block() {
    let source = "func g(a) { write a }\nif True {\n  func g { right }\n  g\n}\ng('z')";
    let config = run_program(source, Tape::new("abc"));
    assert_eq!(config.tape.head(), 1);
    assert_eq!(config.tape.contents(), "azc");
}

#[test]
fn test_print_outputs() {
    let config = run_program("print\nright\nprint\nprint \"end\"", Tape::new("xy"));
    assert_eq!(config.output, vec!["x", "y", "end"]);
}

#[test]
fn test_halt_absorbs_rest_of_program() {
    let config = run_program("write '1'\nreject\nwrite '2'\nprint \"after\"", Tape::new("a"));
    assert_eq!(config.status, Status::Rejected);
    assert_eq!(config.tape.contents(), "1");
    assert!(config.output.is_empty());
}

#[test]
fn test_halt_inside_function_stops_caller() {
    let source = "func stop { accept }\nwhile True {\n  right\n  stop\n}";
    let config = run_program(source, Tape::new("ab"));
    assert_eq!(config.status, Status::Accepted);
    assert_eq!(config.tape.head(), 1);
}

// ============================================
// Large programs
// ============================================

#[test]
fn test_long_program() {
    let source = "right\n".repeat(200_000);
    let (program, _) = tml::parse_source(&source, SymbolTable::new()).unwrap();
    let config = interp::run(&program, Tape::new("")).unwrap();
    assert_eq!(config.tape.head(), 200_000);
    drop(program);
}

#[test]
fn test_deep_condition() {
    let source = format!("while {}False {{ left }}\nright", "not ".repeat(200_000));
    let config = run_program(&source, Tape::new("ab"));
    assert_eq!(config.tape.head(), 1);
}

#[test]
fn test_deeply_nested_blocks() {
    let depth = 10_000;
    let source = format!("{}write '!'{}", "if True {\n".repeat(depth), "\n}".repeat(depth));
    let config = run_program(&source, Tape::new("a"));
    assert_eq!(config.tape.contents(), "!");
}

// ============================================
// Multi-file loading
// ============================================

#[test]
fn test_files_share_declarations() {
    let config = run_files(
        &[
            ("lib.tm", "let blank = space\nfunc erase {\n  write blank\n}"),
            ("main.tm", "erase\nright\nerase"),
        ],
        Tape::new("abc"),
    );
    assert_eq!(config.tape.contents(), "  c");
    assert_eq!(config.status, Status::Accepted);
}

#[test]
fn test_loaded_program_ends_in_accept() {
    let config = run_files(&[("main.tm", "right")], Tape::new("ab"));
    assert_eq!(config.status, Status::Accepted);
}

#[test]
fn test_reject_in_file_wins_over_implicit_accept() {
    let config = run_files(&[("a.tm", "reject"), ("b.tm", "write 'z'")], Tape::new("a"));
    assert_eq!(config.status, Status::Rejected);
    assert_eq!(config.tape.contents(), "a");
}

#[test]
fn test_error_names_offending_file() {
    let sources = [
        SourceFile::new("ok.tm", "left"),
        SourceFile::new("bad.tm", "right right"),
    ];
    let err = fold_files(SymbolTable::new(), &sources).unwrap_err();
    assert_eq!(err.file, "bad.tm");
    assert!(matches!(err.error, CompileError::Syntax { .. }));
}

// ============================================
// Compile errors
// ============================================

#[test]
fn test_error_kinds() {
    assert_eq!(compile_error("write '").kind(), "Lexer");
    assert_eq!(compile_error("left left").kind(), "Syntax");
    assert_eq!(compile_error("let a = 'a'\nlet a = 'b'").kind(), "Scope");
    assert_eq!(compile_error("write nope").kind(), "Scope");
    assert_eq!(compile_error("func f { left }\nf('a')").kind(), "Scope");
    assert_eq!(compile_error("func f { left }\nwrite f").kind(), "Type");
}

#[test]
fn test_undeclared_suggestion() {
    let err = compile_error("let marker = '#'\nwrite markr");
    assert!(err.message().contains("did you mean `marker`?"));
}

#[test]
fn test_scope_ends_with_block() {
    assert!(matches!(
        compile_error("if True {\n  let inner = 'i'\n}\nwrite inner"),
        CompileError::UndeclaredIdentifier { .. }
    ));
}

// ============================================
// Diagnostics
// ============================================

#[test]
fn test_error_spans_point_at_source() {
    let source = "left\nwrite missing";
    let err = compile_error(source);
    let span = err.span().expect("undeclared identifier has a span");
    assert_eq!(&source[span.start..span.end], "missing");
}

#[test]
fn test_runtime_error_locates_file() {
    // Hand-built call whose span points into the second file
    let files = [
        SourceFile::new("lib.tm", "left"),
        SourceFile::new("main.tm", "right\nstamp"),
    ];
    let call = Stm::Call {
        name: "stamp".to_string(),
        args: vec![],
        target: None,
        span: Span::new(11, 16),
    };
    let err = interp::run(&call, Tape::new("a")).unwrap_err();
    let sources: SourceMap = files.into_iter().collect();
    let (file, span) = sources.locate(err.span()).expect("span lies in main.tm");
    assert_eq!(file.name, "main.tm");
    assert_eq!(&file.text[span.start..span.end], "stamp");
}

#[test]
fn test_ast_serializes() {
    let (program, _) = tml::parse_source("let x = read\nwrite x", SymbolTable::new()).unwrap();
    let json = serde_json::to_string(&program).unwrap();
    insta::assert_snapshot!(json, @r#"{"Comp":[{"VarDecl":{"name":"x","value":"Read","span":{"start":4,"end":5}}},{"Write":{"Var":{"name":"x","span":{"start":19,"end":20}}}}]}"#);
}

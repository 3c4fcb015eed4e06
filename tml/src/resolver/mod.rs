//! Multi-file loader
//!
//! Files are parsed in the order given against one shared symbol table, so a
//! later file can call functions and read variables declared at the top
//! level of an earlier one. The resulting statements are sequenced and the
//! whole program ends with an implicit `accept`.
//!
//! Each file is parsed at its own offset into one global span space, so a
//! span in the folded program identifies both the file and the location.
//! [`SourceMap`] turns such a span back into a file-relative one.

use std::path::Path;

use thiserror::Error;

use crate::ast::{Span, Stm};
use crate::error::{report_error, report_runtime_error, CompileError, Result};
use crate::interp::RuntimeError;
use crate::parse_source_at;
use crate::types::SymbolTable;

/// A named piece of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Display name, usually the path
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a source file from disk
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CompileError::io_error(format!("failed to read {}: {e}", path.display()))
        })?;
        Ok(SourceFile::new(path.display().to_string(), text))
    }
}

/// Files laid out one after another in a single span space
///
/// A file starts one byte past the end of the previous one, so no span of
/// one file touches another.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<(usize, SourceFile)>,
    next: usize,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next added file will start at
    pub fn next_base(&self) -> usize {
        self.next
    }

    pub fn files_added(&self) -> usize {
        self.files.len()
    }

    /// Append `file` and return its offset
    pub fn add(&mut self, file: SourceFile) -> usize {
        let base = self.next;
        self.next = base + file.text.len() + 1;
        self.files.push((base, file));
        base
    }

    /// File containing `span` and the span relative to that file
    pub fn locate(&self, span: Span) -> Option<(&SourceFile, Span)> {
        let idx = self.files.partition_point(|(base, _)| *base <= span.start);
        let (base, file) = self.files.get(idx.checked_sub(1)?)?;
        (span.end <= base + file.text.len()).then(|| (file, span.unshift(*base)))
    }

    /// Print a runtime error against the file it points into
    pub fn report(&self, error: &RuntimeError) {
        match self.locate(error.span()) {
            Some((file, span)) => report_runtime_error(&file.name, &file.text, span, error),
            None => eprintln!("Runtime error: {error}"),
        }
    }
}

impl FromIterator<SourceFile> for SourceMap {
    fn from_iter<I: IntoIterator<Item = SourceFile>>(files: I) -> Self {
        let mut map = SourceMap::new();
        for file in files {
            map.add(file);
        }
        map
    }
}

/// Compile error together with the file it occurred in
#[derive(Debug, Clone, Error)]
#[error("{file}: {error}")]
pub struct LoadError {
    pub file: String,
    /// Source text of `file`, kept for rendering the diagnostic
    pub text: String,
    #[source]
    pub error: CompileError,
}

impl LoadError {
    /// Print the diagnostic to stderr
    pub fn report(&self) {
        report_error(&self.file, &self.text, &self.error);
    }
}

/// Parse `files` in order through `table` and join them into one program
/// ending in `accept`
///
/// Spans in the program are laid out as in a [`SourceMap`] built from the
/// same files.
pub fn fold_files(table: SymbolTable, files: &[SourceFile]) -> std::result::Result<Stm, LoadError> {
    let mut table = table;
    let mut parts = Vec::with_capacity(files.len() + 1);
    let mut base = 0;

    for file in files {
        log::info!("loading {} at offset {base}", file.name);
        let (stm, next) = parse_source_at(&file.text, base, table).map_err(|error| LoadError {
            file: file.name.clone(),
            text: file.text.clone(),
            error,
        })?;
        table = next;
        parts.push(stm);
        base += file.text.len() + 1;
    }

    parts.push(Stm::Accept);
    Ok(Stm::seq(parts).unwrap_or(Stm::Accept))
}

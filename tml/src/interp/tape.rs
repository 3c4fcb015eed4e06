//! Unbounded tape with a read/write head

use crate::ast::BLANK;
use std::collections::VecDeque;
use std::fmt;

/// Tape of symbols indexed by signed position
///
/// Only the region between the leftmost and rightmost touched cells is
/// stored; every other position reads as [`BLANK`]. The head may move to
/// negative positions, in which case the tape grows to the left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    /// Position of `cells[0]`
    origin: i64,
    head: i64,
}

impl Tape {
    /// Tape holding `contents` at positions `0..len`, head at 0
    pub fn new(contents: &str) -> Self {
        Self::with_head(contents, 0)
    }

    /// Tape holding `contents` at positions `0..len`, head at `head`
    pub fn with_head(contents: &str, head: i64) -> Self {
        let mut tape = Tape {
            cells: contents.chars().collect(),
            origin: 0,
            head,
        };
        tape.cover_head();
        tape
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    /// Symbol at an arbitrary position
    pub fn cell(&self, pos: i64) -> char {
        usize::try_from(pos - self.origin)
            .ok()
            .and_then(|idx| self.cells.get(idx).copied())
            .unwrap_or(BLANK)
    }

    /// Symbol under the head
    pub fn read(&self) -> char {
        self.cell(self.head)
    }

    pub fn write(mut self, symbol: char) -> Self {
        let idx = self.cover_head();
        self.cells[idx] = symbol;
        self
    }

    pub fn move_left(mut self) -> Self {
        self.head -= 1;
        self.cover_head();
        self
    }

    pub fn move_right(mut self) -> Self {
        self.head += 1;
        self.cover_head();
        self
    }

    /// Leftmost stored position
    pub fn start(&self) -> i64 {
        self.origin
    }

    /// Stored cells from [`Tape::start`] onwards
    pub fn contents(&self) -> String {
        self.cells.iter().collect()
    }

    /// Line with a `^` under the head, aligned with [`Tape::contents`]
    pub fn head_marker(&self) -> String {
        let offset = usize::try_from(self.head - self.origin).unwrap_or(0);
        format!("{}^", " ".repeat(offset))
    }

    /// Extend with blanks until the head is on a stored cell; returns its index
    fn cover_head(&mut self) -> usize {
        while self.head < self.origin {
            self.cells.push_front(BLANK);
            self.origin -= 1;
        }
        let idx = (self.head - self.origin) as usize;
        while idx >= self.cells.len() {
            self.cells.push_back(BLANK);
        }
        idx
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contents())
    }
}

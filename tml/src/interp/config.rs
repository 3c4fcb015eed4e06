//! Machine configuration threaded through evaluation

use super::env::{Environment, Frame};
use super::error::InterpResult;
use super::tape::Tape;
use std::fmt;

/// Halt status of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Running,
    Accepted,
    Rejected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Running => write!(f, "running"),
            Status::Accepted => write!(f, "accept"),
            Status::Rejected => write!(f, "reject"),
        }
    }
}

/// Tape, environment, halt status and output at one point of execution
///
/// Evaluation consumes a configuration and returns the next one. Once the
/// status leaves [`Status::Running`] the evaluator returns the configuration
/// unchanged for every further statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    pub tape: Tape,
    pub env: Environment,
    pub status: Status,
    /// Lines produced by `print`, in program order
    pub output: Vec<String>,
}

impl Configuration {
    pub fn new(tape: Tape) -> Self {
        Configuration {
            tape,
            ..Self::default()
        }
    }

    pub fn is_halted(&self) -> bool {
        self.status != Status::Running
    }

    /// Append a line to the output
    pub fn emit(&mut self, line: impl Into<String>) {
        if !self.is_halted() {
            self.output.push(line.into());
        }
    }

    /// Run `body` with `frame` pushed onto the environment.
    ///
    /// The frame is popped afterwards whether `body` finished normally,
    /// accepted or rejected; the tape, head, status and output it produced
    /// are kept.
    pub fn with_overlay<F>(mut self, frame: Frame, body: F) -> InterpResult<Self>
    where
        F: FnOnce(Self) -> InterpResult<Self>,
    {
        let depth = self.env.depth();
        if !frame.is_empty() {
            log::trace!("overlay at depth {} with bindings {:?}", depth + 1, frame);
        }
        self.env.push_frame(frame);
        let mut result = body(self)?;
        result.env.pop_frame();
        debug_assert_eq!(result.env.depth(), depth);
        Ok(result)
    }
}

//! Runtime environment for variable and function bindings
//!
//! A stack of frames, index 0 being the top level. Bindings are only ever
//! added to the innermost frame and never overwritten: a second binding of
//! the same name shadows the first, and popping the frame brings the first
//! one back.

use crate::ast::{FuncDef, FuncId};
use std::rc::Rc;

/// Bindings introduced by one scope, newest last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    vars: Vec<(String, char)>,
    funcs: Vec<(String, Rc<FuncDef>)>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame binding each parameter to its argument, in order
    pub fn with_vars(bindings: impl IntoIterator<Item = (String, char)>) -> Self {
        Frame {
            vars: bindings.into_iter().collect(),
            funcs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.funcs.is_empty()
    }
}

/// Nested variable and function bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an environment with an empty top-level frame
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::new()],
        }
    }

    /// Current frame depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Drop the innermost frame. The top-level frame is never dropped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind a variable in the innermost frame
    pub fn add_var(&mut self, name: impl Into<String>, value: char) {
        if let Some(frame) = self.frames.last_mut() {
            frame.vars.push((name.into(), value));
        }
    }

    /// Bind a function in the innermost frame
    pub fn add_func(&mut self, name: impl Into<String>, def: Rc<FuncDef>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.funcs.push((name.into(), def));
        }
    }

    /// Look up a variable, newest binding first
    pub fn lookup_var(&self, name: &str) -> Option<char> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.vars.iter().rev())
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| *value)
    }

    /// Look up a function, newest binding first
    pub fn lookup_func(&self, name: &str) -> Option<Rc<FuncDef>> {
        self.resolve_func(name, None)
    }

    /// Look up the binding of `name` declared as `target`, skipping any
    /// newer same-named bindings; with no target, the newest binding
    pub fn resolve_func(&self, name: &str, target: Option<FuncId>) -> Option<Rc<FuncDef>> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.funcs.iter().rev())
            .find(|(bound, def)| bound == name && (target.is_none() || def.id == target))
            .map(|(_, def)| Rc::clone(def))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Span, Stm};

    fn def(name: &str) -> Rc<FuncDef> {
        def_with_id(name, None)
    }

    fn def_with_id(name: &str, id: Option<FuncId>) -> Rc<FuncDef> {
        Rc::new(FuncDef {
            id,
            name: name.to_string(),
            params: vec![],
            body: Stm::Accept,
            span: Span::default(),
        })
    }

    #[test]
    fn test_add_and_lookup_var() {
        let mut env = Environment::new();
        env.add_var("x", 'a');
        assert_eq!(env.lookup_var("x"), Some('a'));
        assert_eq!(env.lookup_var("y"), None);
    }

    #[test]
    fn test_vars_and_funcs_are_separate() {
        let mut env = Environment::new();
        env.add_var("f", 'a');
        assert!(env.lookup_func("f").is_none());
        env.add_func("f", def("f"));
        assert_eq!(env.lookup_var("f"), Some('a'));
        assert_eq!(env.lookup_func("f").unwrap().name, "f");
    }

    #[test]
    fn test_rebinding_in_same_frame_shadows() {
        let mut env = Environment::new();
        env.add_var("x", 'a');
        env.add_var("x", 'b');
        assert_eq!(env.lookup_var("x"), Some('b'));
    }

    #[test]
    fn test_pop_restores_outer_binding() {
        let mut env = Environment::new();
        env.add_var("x", '1');
        let before = env.clone();

        env.push_frame(Frame::with_vars([("x".to_string(), '2')]));
        env.add_var("y", '3');
        assert_eq!(env.lookup_var("x"), Some('2'));
        assert_eq!(env.lookup_var("y"), Some('3'));

        env.pop_frame();
        assert_eq!(env, before);
        assert_eq!(env.lookup_var("x"), Some('1'));
        assert_eq!(env.lookup_var("y"), None);
    }

    #[test]
    fn test_inner_frame_sees_outer_bindings() {
        let mut env = Environment::new();
        env.add_func("outer", def("outer"));
        env.push_frame(Frame::new());
        assert!(env.lookup_func("outer").is_some());
    }

    #[test]
    fn test_resolve_skips_newer_declaration_of_same_name() {
        let mut env = Environment::new();
        env.add_func("g", def_with_id("g", Some(FuncId(0))));
        env.push_frame(Frame::new());
        env.add_func("g", def_with_id("g", Some(FuncId(7))));

        assert_eq!(env.lookup_func("g").unwrap().id, Some(FuncId(7)));
        assert_eq!(
            env.resolve_func("g", Some(FuncId(0))).unwrap().id,
            Some(FuncId(0))
        );
        assert!(env.resolve_func("g", Some(FuncId(3))).is_none());
    }

    #[test]
    fn test_top_level_frame_is_kept() {
        let mut env = Environment::new();
        env.add_var("x", 'a');
        env.pop_frame();
        assert_eq!(env.depth(), 1);
        assert_eq!(env.lookup_var("x"), Some('a'));
    }

    #[test]
    fn test_deep_nesting() {
        let mut env = Environment::new();
        for i in 0..1000u32 {
            env.push_frame(Frame::new());
            env.add_var(format!("v{i}"), char::from_digit(i % 10, 10).unwrap());
        }
        assert_eq!(env.depth(), 1001);
        assert_eq!(env.lookup_var("v0"), Some('0'));
        assert_eq!(env.lookup_var("v999"), Some('9'));
        for _ in 0..1000 {
            env.pop_frame();
        }
        assert_eq!(env.lookup_var("v0"), None);
    }
}

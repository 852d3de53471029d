//! Scope stack for evaluation.
//!
//! A frame is a shared handle to the block being evaluated, so lookups always
//! see the live block (including rules spliced in by import and mixin
//! expansion) and closures captured from an environment keep observing it.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use less_ir::{Block, Expr, Name, Node};

/// A single-threaded shared, mutable handle.
///
/// Wraps `Rc<RefCell<T>>` so every scope allocation goes through
/// [`LocalScope::new`]. Evaluation is single-threaded; trees themselves stay
/// `Send + Sync`, only the evaluator's working state uses this type.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether two handles point at the same value.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

/// One scope: the block of a stylesheet, ruleset, media block, mixin body or
/// the bound arguments of a mixin call.
pub type Frame = LocalScope<Block>;

/// Ordered frame list, innermost last.
#[derive(Clone, Default)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Shallow copy: the frame list is new, the frames are shared.
    pub fn copy(&self) -> Environment {
        self.clone()
    }

    /// Append frames after the current innermost frame.
    pub fn append(&mut self, frames: &[Frame]) {
        self.frames.extend(frames.iter().cloned());
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Value of the innermost definition of `name`.
    pub fn lookup_variable(&self, name: Name) -> Option<Expr> {
        self.frames.iter().rev().find_map(|frame| {
            let block = frame.borrow();
            match block.variable(name) {
                Some(Node::Definition(def)) => Some(def.value.clone()),
                _ => None,
            }
        })
    }

    /// Push `frame` for the lifetime of the returned guard.
    pub fn scoped(&mut self, frame: Frame) -> ScopedEnv<'_> {
        self.push(frame);
        ScopedEnv { env: self }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.frames.len())
            .finish()
    }
}

/// RAII guard that pops the frame pushed by [`Environment::scoped`] on drop,
/// including when evaluation returns early with an error.
pub struct ScopedEnv<'a> {
    env: &'a mut Environment,
}

impl Drop for ScopedEnv<'_> {
    fn drop(&mut self) {
        self.env.pop();
    }
}

impl Deref for ScopedEnv<'_> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl DerefMut for ScopedEnv<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

#[cfg(test)]
mod tests;

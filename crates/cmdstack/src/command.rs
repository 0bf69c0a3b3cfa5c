#![forbid(unsafe_code)]

//! Commands: first-class actions with an optional inverse.
//!
//! A [`Command`] wraps an execute action, an optional undo action, an
//! optional display name, and an optional [`Stack`] it reports to. All of it
//! is fixed when the command is built; there are no setters.
//!
//! # Extending commands
//!
//! `execute()` and `undo()` are inherent methods, not trait methods, because
//! stack bookkeeping hangs off exactly those two entry points. Specialized
//! commands are factory functions that compute their parameters once and
//! capture them in the closures:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use cmdstack::{Command, Stack};
//!
//! fn add(counter: &Rc<Cell<i64>>, stack: &Stack, amount: i64) -> Command {
//!     let up = Rc::clone(counter);
//!     let down = Rc::clone(counter);
//!     Command::builder(move || {
//!         up.set(up.get() + amount);
//!         Ok(())
//!     })
//!     .with_undo(move || {
//!         down.set(down.get() - amount);
//!         Ok(())
//!     })
//!     .with_stack(stack)
//!     .with_name(format!("Add {amount}"))
//!     .build()
//! }
//!
//! let stack = Stack::default();
//! let counter = Rc::new(Cell::new(0));
//! add(&counter, &stack, 5).execute().unwrap();
//! assert_eq!((counter.get(), stack.len()), (5, 1));
//! stack.undo().unwrap();
//! assert_eq!(counter.get(), 0);
//! ```
//!
//! # Invariants
//!
//! - Running a command never mutates the command; repeated execution runs the
//!   same captured closures.
//! - Clones share identity: the stack may hold one command at several indices.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{CommandError, CommandResult};
use crate::stack::{Stack, WeakStack};

/// A caller-supplied, zero-argument, fallible operation.
pub type Action = Rc<dyn Fn() -> CommandResult>;

/// Adapt an infallible closure into an [`Action`]-compatible one.
pub fn infallible(f: impl Fn() + 'static) -> impl Fn() -> CommandResult + 'static {
    move || {
        f();
        Ok(())
    }
}

struct CommandInner {
    execute: Action,
    undo: Option<Action>,
    stack: Option<WeakStack>,
    name: Option<String>,
}

/// Shared handle to an executable action and its optional inverse.
///
/// Cloning is cheap and yields a handle to the same command.
#[derive(Clone)]
pub struct Command {
    inner: Rc<CommandInner>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.inner.name)
            .field("reversible", &self.is_reversible())
            .field("bound", &self.inner.stack.is_some())
            .finish()
    }
}

impl Command {
    /// Start building a command around `execute`.
    pub fn builder<F>(execute: F) -> CommandBuilder
    where
        F: Fn() -> CommandResult + 'static,
    {
        CommandBuilder {
            execute: Rc::new(execute),
            undo: None,
            stack: None,
            name: None,
        }
    }

    /// Unbound, irreversible command.
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn() -> CommandResult + 'static,
    {
        Self::builder(execute).build()
    }

    /// Unbound command with an undo action.
    pub fn reversible<E, U>(execute: E, undo: U) -> Self
    where
        E: Fn() -> CommandResult + 'static,
        U: Fn() -> CommandResult + 'static,
    {
        Self::builder(execute).with_undo(undo).build()
    }

    /// Unbound, irreversible command around an infallible closure.
    pub fn from_fn(execute: impl Fn() + 'static) -> Self {
        Self::new(infallible(execute))
    }

    /// Run the execute action, then push this command onto its bound stack.
    ///
    /// Nothing is pushed if the action fails. If the bound stack has already
    /// been dropped the action still runs and the push is skipped.
    pub fn execute(&self) -> CommandResult {
        (self.inner.execute)()?;
        if let Some(weak) = &self.inner.stack {
            match weak.upgrade() {
                Some(stack) => stack.push(self.clone()),
                None => trace!(name = ?self.inner.name, "bound stack dropped; push skipped"),
            }
        }
        Ok(())
    }

    /// Run the undo action directly, bypassing any stack bookkeeping.
    ///
    /// # Errors
    ///
    /// [`CommandError::UndoUnsupported`] if the command has no undo action,
    /// otherwise whatever the action returns.
    pub fn undo(&self) -> CommandResult {
        match &self.inner.undo {
            Some(undo) => undo(),
            None => Err(CommandError::UndoUnsupported {
                name: self.inner.name.clone(),
            }),
        }
    }

    /// Display label, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Whether an undo action was supplied.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.inner.undo.is_some()
    }

    /// The stack this command reports to, if it is bound and still alive.
    #[must_use]
    pub fn bound_stack(&self) -> Option<Stack> {
        self.inner.stack.as_ref().and_then(WeakStack::upgrade)
    }

    /// Whether both handles refer to the same command.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute action only; used by the stack for redo and replay.
    pub(crate) fn run_execute(&self) -> CommandResult {
        (self.inner.execute)()
    }

    /// Undo action only, or `None` if the command has none.
    pub(crate) fn run_undo(&self) -> Option<CommandResult> {
        self.inner.undo.as_ref().map(|undo| undo())
    }
}

/// Construction-time configuration for a [`Command`].
#[must_use = "call build() to obtain the Command"]
pub struct CommandBuilder {
    execute: Action,
    undo: Option<Action>,
    stack: Option<WeakStack>,
    name: Option<String>,
}

impl fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("has_undo", &self.undo.is_some())
            .field("bound", &self.stack.is_some())
            .finish()
    }
}

impl CommandBuilder {
    /// Set the undo action.
    pub fn with_undo<F>(mut self, undo: F) -> Self
    where
        F: Fn() -> CommandResult + 'static,
    {
        self.undo = Some(Rc::new(undo));
        self
    }

    /// Set an infallible undo action.
    pub fn with_undo_fn(self, undo: impl Fn() + 'static) -> Self {
        self.with_undo(infallible(undo))
    }

    /// Bind the command to `stack`; `execute()` will push onto it.
    pub fn with_stack(mut self, stack: &Stack) -> Self {
        self.stack = Some(stack.downgrade());
        self
    }

    /// Set the display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Command {
        Command {
            inner: Rc::new(CommandInner {
                execute: self.execute,
                undo: self.undo,
                stack: self.stack,
                name: self.name,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter_cmd(counter: &Rc<Cell<i32>>) -> CommandBuilder {
        let up = Rc::clone(counter);
        let down = Rc::clone(counter);
        Command::builder(infallible(move || up.set(up.get() + 1)))
            .with_undo_fn(move || down.set(down.get() - 1))
    }

    #[test]
    fn execute_runs_action() {
        let counter = Rc::new(Cell::new(0));
        let cmd = counter_cmd(&counter).build();
        cmd.execute().unwrap();
        cmd.execute().unwrap();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn direct_undo_runs_inverse() {
        let counter = Rc::new(Cell::new(0));
        let cmd = counter_cmd(&counter).build();
        cmd.execute().unwrap();
        cmd.undo().unwrap();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn undo_without_action_is_unsupported() {
        let cmd = Command::builder(|| Ok(())).with_name("Noop").build();
        assert!(!cmd.is_reversible());
        assert_eq!(
            cmd.undo(),
            Err(CommandError::UndoUnsupported {
                name: Some("Noop".into())
            })
        );
    }

    #[test]
    fn execute_pushes_onto_bound_stack() {
        let stack = Stack::default();
        let counter = Rc::new(Cell::new(0));
        let cmd = counter_cmd(&counter).with_stack(&stack).build();

        cmd.execute().unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pointer(), 1);
        assert!(stack.get(0).unwrap().ptr_eq(&cmd));
    }

    #[test]
    fn failed_execute_does_not_push() {
        let stack = Stack::default();
        let cmd = Command::builder(|| Err(CommandError::failed("nope")))
            .with_stack(&stack)
            .build();
        assert_eq!(cmd.execute(), Err(CommandError::failed("nope")));
        assert!(stack.is_empty());
    }

    #[test]
    fn direct_undo_bypasses_stack() {
        let stack = Stack::default();
        let counter = Rc::new(Cell::new(0));
        let cmd = counter_cmd(&counter).with_stack(&stack).build();
        cmd.execute().unwrap();

        cmd.undo().unwrap();
        assert_eq!(counter.get(), 0);
        assert_eq!(stack.pointer(), 1);
    }

    #[test]
    fn dropped_stack_skips_push() {
        let stack = Stack::default();
        let counter = Rc::new(Cell::new(0));
        let cmd = counter_cmd(&counter).with_stack(&stack).build();
        drop(stack);

        assert!(cmd.bound_stack().is_none());
        cmd.execute().unwrap();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn clones_share_identity() {
        let a = Command::from_fn(|| {});
        let b = a.clone();
        let c = Command::from_fn(|| {});
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn debug_shows_name_and_flags() {
        let cmd = Command::reversible(|| Ok(()), || Ok(()));
        let dbg = format!("{cmd:?}");
        assert!(dbg.contains("reversible: true"));
        assert!(dbg.contains("bound: false"));

        let named = Command::builder(|| Ok(())).with_name("Paint").build();
        assert_eq!(named.name(), Some("Paint"));
    }
}

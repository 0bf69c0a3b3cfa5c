#![forbid(unsafe_code)]

//! Command pattern with an observable undo/redo history.
//!
//! # Key Components
//!
//! - [`Command`] - an execute action, an optional undo action, and an
//!   optional [`Stack`] it pushes itself onto after executing
//! - [`Stack`] - ordered history with a pointer separating applied entries
//!   from pending ones; supports `push`, `undo`, `redo`, `step_to`, `clear`
//! - [`StackConfig`] - selects [`ReversalMode::RedoFromStart`] by supplying a
//!   reset command
//!
//! Stacks announce every change to their subscribers and can be traversed
//! through [`Enumerable`], which is enough to keep a history list in a UI in
//! sync.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use cmdstack::prelude::*;
//!
//! let stack = Stack::default();
//! let counter = Rc::new(Cell::new(0));
//! let (up, down) = (Rc::clone(&counter), Rc::clone(&counter));
//! let increment = Command::builder(infallible(move || up.set(up.get() + 1)))
//!     .with_undo_fn(move || down.set(down.get() - 1))
//!     .with_stack(&stack)
//!     .build();
//!
//! increment.execute()?;
//! increment.execute()?;
//! stack.undo()?;
//! assert_eq!((counter.get(), stack.pointer(), stack.len()), (1, 1, 2));
//!
//! increment.execute()?; // truncates the undone entry
//! assert_eq!((stack.pointer(), stack.len()), (2, 2));
//! # Ok::<(), CommandError>(())
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded and synchronous. Handles are `!Send`;
//! callers needing shared access must serialize it themselves.

pub mod command;
pub mod config;
pub mod error;
pub mod stack;

pub use cmdstack_core::{Enumerable, Snapshot, Subscription};
pub use command::{Action, Command, CommandBuilder, infallible};
pub use config::{ReversalMode, StackConfig};
pub use error::{CommandError, CommandResult};
pub use stack::{HistoryEntry, Stack, WeakStack};

/// Common imports.
pub mod prelude {
    pub use crate::{
        Command, CommandError, CommandResult, Enumerable, ReversalMode, Stack, StackConfig,
        Subscription, infallible,
    };
}

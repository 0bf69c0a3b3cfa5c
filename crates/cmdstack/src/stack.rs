#![forbid(unsafe_code)]

//! Ordered command history with a movable pointer.
//!
//! Entries `[0, pointer)` are applied, entries `[pointer, len)` are pending.
//! Pushing while the pointer is below the top discards the pending entries
//! first, so history never branches.
//!
//! ```text
//! push(c1..c4)            [c1 c2 c3 c4]      pointer = 4
//!                                      ^
//! step_to(2)              [c1 c2|c3 c4]      pointer = 2
//!                               ^
//! push(c5)                [c1 c2 c5]         pointer = 3  (c3, c4 dropped)
//!                                   ^
//! ```
//!
//! # Reversal modes
//!
//! - [`ReversalMode::PerCommandUndo`]: undo runs the entry's undo action, redo
//!   runs its execute action, one entry at a time.
//! - [`ReversalMode::RedoFromStart`]: every pointer move sets the pointer,
//!   runs the reset action once, then re-runs `[0, pointer)` in order. Undo
//!   actions are never called, so entries need not have one.
//!
//! # Invariants
//!
//! 1. `0 <= pointer <= len` after every operation.
//! 2. After `push`, `pointer == len`.
//! 3. `len` changes only on `push` and `clear`.
//! 4. Observers hear exactly one notification per `push`, `clear`, and per
//!    `undo`/`redo`/`step_to` call that changed the pointer.
//!
//! # Failure Modes
//!
//! - **Irreversible entry**: per-command undo reaching an entry without an
//!   undo action returns [`CommandError::Irreversible`]; the pointer stays.
//! - **Action failure mid-walk**: a failing action aborts the remaining steps
//!   and the error is returned unmodified. In per-command mode the pointer
//!   reflects the steps that completed. In redo-from-start mode the pointer
//!   is already at the target while the replayed state is partial. The stack
//!   cannot repair either case; treat it as unusable or `clear()` it.
//!
//! # Re-entrancy
//!
//! No internal borrow is held while an action or observer runs, so both may
//! read the stack. Observers may also drive it (for example, a UI resyncing
//! by calling `step_to`), which produces nested notifications.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use cmdstack_core::{Enumerable, Notifier, Snapshot, Subscription};
use tracing::{debug, debug_span, trace};

use crate::command::Command;
use crate::config::{ReversalMode, StackConfig};
use crate::error::{CommandError, CommandResult};

struct StackState {
    entries: Vec<Command>,
    pointer: usize,
    version: u64,
}

struct StackShared {
    state: RefCell<StackState>,
    reset: Option<Command>,
    label: Option<String>,
    observers: Notifier<Stack>,
}

/// Shared handle to a command history.
///
/// Cloning yields another handle to the same history. Handles are `!Send`;
/// a stack has a single logical owner.
#[derive(Clone)]
pub struct Stack {
    shared: Rc<StackShared>,
}

/// Non-owning handle to a [`Stack`], held by bound commands.
#[derive(Clone)]
pub struct WeakStack {
    shared: Weak<StackShared>,
}

/// One row of a rendered history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Position in the history.
    pub index: usize,
    /// The command's display label.
    pub name: Option<String>,
    /// `index < pointer`.
    pub applied: bool,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Stack")
            .field("label", &self.shared.label)
            .field("mode", &self.mode())
            .field("len", &state.entries.len())
            .field("pointer", &state.pointer)
            .field("version", &state.version)
            .field("subscribers", &self.shared.observers.subscriber_count())
            .finish()
    }
}

impl fmt::Debug for WeakStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStack")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl WeakStack {
    /// The stack, if any strong handle is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Stack> {
        self.shared.upgrade().map(|shared| Stack { shared })
    }
}

impl Stack {
    /// Create an empty stack.
    #[must_use]
    pub fn new(config: StackConfig) -> Self {
        Self {
            shared: Rc::new(StackShared {
                state: RefCell::new(StackState {
                    entries: Vec::new(),
                    pointer: 0,
                    version: 0,
                }),
                reset: config.redo_from_start,
                label: config.label,
                observers: Notifier::new(),
            }),
        }
    }

    /// Create an empty stack in redo-from-start mode.
    #[must_use]
    pub fn redo_from_start(reset: Command) -> Self {
        Self::new(StackConfig::new().with_redo_from_start(reset))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Record `command` as the newest applied entry.
    ///
    /// Pending entries above the pointer are discarded first. The command is
    /// not executed here; the caller has already run it.
    pub fn push(&self, command: Command) {
        let (discarded, pointer, len) = {
            let mut state = self.shared.state.borrow_mut();
            let at = state.pointer;
            let discarded = state.entries.split_off(at);
            state.entries.push(command);
            state.pointer = state.entries.len();
            (discarded, state.pointer, state.entries.len())
        };
        debug!(
            stack = self.display_label(),
            pointer,
            len,
            truncated = discarded.len(),
            "pushed command"
        );
        drop(discarded);
        self.changed();
    }

    /// Run `command`'s execute action and record it, without going through
    /// the command's own bound stack.
    ///
    /// Useful for unbound commands. Nothing is recorded if the action fails.
    pub fn apply(&self, command: Command) -> CommandResult {
        command.run_execute()?;
        self.push(command);
        Ok(())
    }

    /// Step the pointer back by one. A no-op at the start of history.
    ///
    /// # Errors
    ///
    /// [`CommandError::Irreversible`] in per-command mode if the entry has no
    /// undo action, or the error of a failing action.
    pub fn undo(&self) -> CommandResult {
        let pointer = self.pointer();
        if pointer == 0 {
            trace!(stack = self.display_label(), "undo at start of history");
            return Ok(());
        }
        self.move_to(pointer - 1)
    }

    /// Step the pointer forward by one. A no-op at the end of history.
    ///
    /// # Errors
    ///
    /// The error of a failing action.
    pub fn redo(&self) -> CommandResult {
        let (pointer, len) = self.position();
        if pointer >= len {
            trace!(stack = self.display_label(), "redo at end of history");
            return Ok(());
        }
        self.move_to(pointer + 1)
    }

    /// Move the pointer to `target`.
    ///
    /// Per-command mode walks one entry at a time, as repeated `undo`/`redo`
    /// would. Redo-from-start mode resets once and replays `[0, target)`.
    /// Observers are notified once for the whole move.
    ///
    /// # Errors
    ///
    /// [`CommandError::OutOfRange`] if `target > len` (nothing is mutated),
    /// plus anything [`undo`](Self::undo) or [`redo`](Self::redo) can return.
    pub fn step_to(&self, target: usize) -> CommandResult {
        let (pointer, len) = self.position();
        if target > len {
            return Err(CommandError::OutOfRange {
                target,
                length: len,
            });
        }
        if target == pointer {
            return Ok(());
        }
        self.move_to(target)
    }

    /// Discard all history. Always notifies.
    pub fn clear(&self) {
        let discarded = {
            let mut state = self.shared.state.borrow_mut();
            state.pointer = 0;
            std::mem::take(&mut state.entries)
        };
        debug!(
            stack = self.display_label(),
            discarded = discarded.len(),
            "cleared history"
        );
        drop(discarded);
        self.changed();
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Register `callback` to run after every state change.
    ///
    /// The callback receives this stack in its post-change state. Dropping
    /// the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&Stack) + 'static) -> Subscription {
        self.shared.observers.subscribe(callback)
    }

    /// Number of registered observers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.observers.subscriber_count()
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.borrow().entries.len()
    }

    /// Number of applied entries; also the index `redo` would apply next.
    #[must_use]
    pub fn pointer(&self) -> usize {
        self.shared.state.borrow().pointer
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.state.borrow().entries.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.pointer() > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        let (pointer, len) = self.position();
        pointer < len
    }

    #[must_use]
    pub fn mode(&self) -> ReversalMode {
        if self.shared.reset.is_some() {
            ReversalMode::RedoFromStart
        } else {
            ReversalMode::PerCommandUndo
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.shared.label.as_deref()
    }

    /// Change counter, bumped once per notification. Useful for
    /// dirty-checking in render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Command> {
        self.shared.state.borrow().entries.get(index).cloned()
    }

    /// Entries `[0, pointer)`.
    #[must_use]
    pub fn applied(&self) -> Vec<Command> {
        let state = self.shared.state.borrow();
        state.entries[..state.pointer].to_vec()
    }

    /// Entries `[pointer, len)`.
    #[must_use]
    pub fn pending(&self) -> Vec<Command> {
        let state = self.shared.state.borrow();
        state.entries[state.pointer..].to_vec()
    }

    /// Name of the entry `undo` would act on.
    #[must_use]
    pub fn next_undo_name(&self) -> Option<String> {
        let index = self.pointer().checked_sub(1)?;
        self.get(index)?.name().map(str::to_owned)
    }

    /// Name of the entry `redo` would act on.
    #[must_use]
    pub fn next_redo_name(&self) -> Option<String> {
        self.get(self.pointer())?.name().map(str::to_owned)
    }

    /// Render-ready view of the whole history.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        let state = self.shared.state.borrow();
        state
            .entries
            .iter()
            .enumerate()
            .map(|(index, command)| HistoryEntry {
                index,
                name: command.name().map(str::to_owned),
                applied: index < state.pointer,
            })
            .collect()
    }

    /// Non-owning handle to this stack.
    #[must_use]
    pub fn downgrade(&self) -> WeakStack {
        WeakStack {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Whether both handles refer to the same stack.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn position(&self) -> (usize, usize) {
        let state = self.shared.state.borrow();
        (state.pointer, state.entries.len())
    }

    fn display_label(&self) -> &str {
        self.shared.label.as_deref().unwrap_or("stack")
    }

    fn set_pointer(&self, pointer: usize) {
        let mut state = self.shared.state.borrow_mut();
        state.pointer = pointer.min(state.entries.len());
    }

    fn changed(&self) {
        self.shared.state.borrow_mut().version += 1;
        self.shared.observers.notify(self);
    }

    fn move_to(&self, target: usize) -> CommandResult {
        let from = self.pointer();
        let result = match &self.shared.reset {
            Some(reset) => self.replay_to(reset, target),
            None => self.walk_to(target),
        };
        let (pointer, len) = self.position();
        debug!(
            stack = self.display_label(),
            from,
            to = target,
            pointer,
            len,
            ok = result.is_ok(),
            "moved pointer"
        );
        if pointer != from {
            self.changed();
        }
        result
    }

    fn walk_to(&self, target: usize) -> CommandResult {
        loop {
            let moved = match self.pointer().cmp(&target) {
                Ordering::Greater => self.undo_step()?,
                Ordering::Less => self.redo_step()?,
                Ordering::Equal => return Ok(()),
            };
            if !moved {
                return Ok(());
            }
        }
    }

    fn undo_step(&self) -> Result<bool, CommandError> {
        let Some(index) = self.pointer().checked_sub(1) else {
            return Ok(false);
        };
        let Some(entry) = self.get(index) else {
            return Ok(false);
        };
        match entry.run_undo() {
            Some(result) => result?,
            None => {
                return Err(CommandError::Irreversible {
                    index,
                    name: entry.name().map(str::to_owned),
                });
            }
        }
        self.set_pointer(index);
        Ok(true)
    }

    fn redo_step(&self) -> Result<bool, CommandError> {
        let index = self.pointer();
        let Some(entry) = self.get(index) else {
            return Ok(false);
        };
        entry.run_execute()?;
        self.set_pointer(index + 1);
        Ok(true)
    }

    fn replay_to(&self, reset: &Command, target: usize) -> CommandResult {
        let prefix = {
            let mut state = self.shared.state.borrow_mut();
            let end = target.min(state.entries.len());
            state.pointer = end;
            state.entries[..end].to_vec()
        };

        let span = debug_span!(
            "cmdstack.replay",
            stack = self.display_label(),
            to = target,
            replayed = tracing::field::Empty
        );
        let _guard = span.enter();

        let mut replayed = 0_u64;
        let result = reset.run_execute().and_then(|()| {
            prefix.iter().try_for_each(|entry| -> CommandResult {
                entry.run_execute()?;
                replayed += 1;
                Ok(())
            })
        });
        span.record("replayed", replayed);
        result
    }
}

impl Enumerable for Stack {
    type Item = Command;

    fn snapshot(&self) -> Snapshot<Command> {
        Snapshot::new(self.shared.state.borrow().entries.clone())
    }
}

#![forbid(unsafe_code)]

//! Error taxonomy for commands and history stacks.

use thiserror::Error;

/// Result of running a command, one of its actions, or a stack operation.
pub type CommandResult = Result<(), CommandError>;

/// Errors surfaced by [`Command`](crate::Command) and [`Stack`](crate::Stack).
///
/// Undo at the bottom of history and redo at the top are not errors; those
/// calls are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `Command::undo()` was called on a command built without an undo action.
    #[error("command {} has no undo action", display_name(.name))]
    UndoUnsupported { name: Option<String> },

    /// A per-command-undo stack reached an entry without an undo action.
    /// The pointer stays where it was.
    #[error("history entry {index} ({}) is not reversible", display_name(.name))]
    Irreversible { index: usize, name: Option<String> },

    /// `step_to` target outside `[0, length]`. Nothing was mutated.
    #[error("step target {target} out of range (length {length})")]
    OutOfRange { target: usize, length: usize },

    /// A caller-supplied action failed.
    #[error("{message}")]
    Failed { message: String },
}

impl CommandError {
    /// Build the error a caller action returns when it cannot complete.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_irreversible(&self) -> bool {
        matches!(self, Self::Irreversible { .. } | Self::UndoUnsupported { .. })
    }

    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

fn display_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("<unnamed>")
}

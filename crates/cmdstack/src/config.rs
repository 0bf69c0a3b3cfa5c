#![forbid(unsafe_code)]

//! Stack construction options.

use crate::command::Command;

/// How a [`Stack`](crate::Stack) reverses history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReversalMode {
    /// Undo calls the entry's own undo action; redo re-runs its execute action.
    #[default]
    PerCommandUndo,
    /// Every pointer move runs the reset action once, then replays the
    /// applied prefix of history. Undo actions are never used.
    RedoFromStart,
}

/// Configuration for a [`Stack`](crate::Stack).
///
/// The reversal mode is derived from the presence of a reset command and
/// cannot change after the stack is built.
#[derive(Debug, Clone, Default)]
pub struct StackConfig {
    /// Reset action for redo-from-start mode. Only its execute action is run.
    pub redo_from_start: Option<Command>,
    /// Label used in traces and `Debug` output.
    pub label: Option<String>,
}

impl StackConfig {
    /// Per-command-undo configuration with no label.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to redo-from-start mode with `reset` as the baseline action.
    #[must_use]
    pub fn with_redo_from_start(mut self, reset: Command) -> Self {
        self.redo_from_start = Some(reset);
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mode a stack built from this configuration will use.
    #[must_use]
    pub fn mode(&self) -> ReversalMode {
        if self.redo_from_start.is_some() {
            ReversalMode::RedoFromStart
        } else {
            ReversalMode::PerCommandUndo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_per_command() {
        let config = StackConfig::default();
        assert_eq!(config.mode(), ReversalMode::PerCommandUndo);
        assert!(config.label.is_none());
    }

    #[test]
    fn reset_selects_redo_from_start() {
        let config = StackConfig::new()
            .with_redo_from_start(Command::from_fn(|| {}))
            .with_label("canvas");
        assert_eq!(config.mode(), ReversalMode::RedoFromStart);
        assert_eq!(config.label.as_deref(), Some("canvas"));
    }
}

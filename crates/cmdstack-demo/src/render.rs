//! Plain-text history panel.
//!
//! Applied entries are listed above a marker line, pending ones below it,
//! which is what an "action history" sidebar shows.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use cmdstack::{HistoryEntry, Stack, Subscription};

/// Rendering options for [`HistoryPanel`].
#[derive(Debug, Clone)]
pub struct HistoryPanel {
    title: String,
    marker_text: String,
    undo_icon: String,
    redo_icon: String,
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "History".to_string(),
            marker_text: "--- current ---".to_string(),
            undo_icon: "[x] ".to_string(),
            redo_icon: "[ ] ".to_string(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_marker_text(mut self, text: impl Into<String>) -> Self {
        self.marker_text = text.into();
        self
    }

    /// Render `stack`'s current history.
    #[must_use]
    pub fn render(&self, stack: &Stack) -> String {
        self.render_entries(&stack.history(), stack.pointer())
    }

    /// Render pre-collected rows; `pointer` places the marker.
    #[must_use]
    pub fn render_entries(&self, rows: &[HistoryEntry], pointer: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({pointer}/{})", self.title, rows.len());
        for row in rows {
            if row.index == pointer {
                let _ = writeln!(out, "  {}", self.marker_text);
            }
            let icon = if row.applied {
                &self.undo_icon
            } else {
                &self.redo_icon
            };
            let name = row.name.as_deref().unwrap_or("(unnamed)");
            let _ = writeln!(out, "  {icon}{name}");
        }
        if pointer == rows.len() {
            let _ = writeln!(out, "  {}", self.marker_text);
        }
        out
    }
}

/// Keeps the most recent panel rendering, refreshed by stack notifications.
pub struct Frames {
    latest: Rc<RefCell<Option<String>>>,
    _subscription: Subscription,
}

impl Frames {
    /// Subscribe `panel` to `stack`. Unsubscribes when dropped.
    #[must_use]
    pub fn attach(stack: &Stack, panel: HistoryPanel) -> Self {
        let latest = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&latest);
        let subscription = stack.subscribe(move |stack| {
            *sink.borrow_mut() = Some(panel.render(stack));
        });
        Self {
            latest,
            _subscription: subscription,
        }
    }

    /// The frame rendered since the last call, if the stack changed.
    pub fn take(&self) -> Option<String> {
        self.latest.borrow_mut().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdstack::Command;

    fn named(name: &str) -> Command {
        Command::builder(|| Ok(()))
            .with_undo(|| Ok(()))
            .with_name(name)
            .build()
    }

    #[test]
    fn empty_history_shows_marker_only() {
        let stack = Stack::default();
        let text = HistoryPanel::new().render(&stack);
        assert_eq!(text, "History (0/0)\n  --- current ---\n");
    }

    #[test]
    fn marker_sits_at_pointer() {
        let stack = Stack::default();
        stack.push(named("Cut"));
        stack.push(named("Paste"));
        stack.undo().unwrap();

        let text = HistoryPanel::new().with_title("Edits").render(&stack);
        assert_eq!(
            text,
            "Edits (1/2)\n  [x] Cut\n  --- current ---\n  [ ] Paste\n"
        );
    }

    #[test]
    fn frames_refresh_only_on_change() {
        let stack = Stack::default();
        let frames = Frames::attach(&stack, HistoryPanel::new());
        assert!(frames.take().is_none());

        stack.push(named("Cut"));
        let frame = frames.take().unwrap();
        assert!(frame.starts_with("History (1/1)"));
        assert!(frames.take().is_none());

        stack.redo().unwrap();
        assert!(frames.take().is_none());
    }

    #[test]
    fn custom_marker_and_unnamed_rows() {
        let stack = Stack::default();
        stack.push(Command::from_fn(|| {}));
        let text = HistoryPanel::new().with_marker_text("<>").render(&stack);
        assert!(text.contains("[x] (unnamed)"));
        assert!(text.ends_with("  <>\n"));
    }
}

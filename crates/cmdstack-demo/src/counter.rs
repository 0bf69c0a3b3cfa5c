//! Per-command undo over a shared counter.

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use cmdstack::{Command, Stack, StackConfig};
use tracing::info;

use crate::error::Result;
use crate::render::{Frames, HistoryPanel};

/// Build an increment command bound to `stack`.
pub fn increment(counter: &Rc<Cell<i64>>, stack: &Stack) -> Command {
    let up = Rc::clone(counter);
    let down = Rc::clone(counter);
    Command::builder(move || {
        up.set(up.get() + 1);
        Ok(())
    })
    .with_undo(move || {
        down.set(down.get() - 1);
        Ok(())
    })
    .with_stack(stack)
    .with_name("Increment")
    .build()
}

/// Push, undo, redo and truncate a counter history, printing each state.
pub fn run_counter(out: &mut dyn Write) -> Result<()> {
    info!("running counter scenario");
    let stack = Stack::new(StackConfig::new().with_label("counter"));
    let counter = Rc::new(Cell::new(0_i64));
    let frames = Frames::attach(&stack, HistoryPanel::new().with_title("Counter history"));
    let c1 = increment(&counter, &stack);

    let report = |out: &mut dyn Write, action: &str| -> Result<()> {
        writeln!(
            out,
            "{action:<8} counter={} length={} pointer={}",
            counter.get(),
            stack.len(),
            stack.pointer()
        )?;
        if let Some(frame) = frames.take() {
            write!(out, "{frame}")?;
        }
        Ok(())
    };

    report(out, "start")?;
    c1.execute()?;
    report(out, "push C1")?;
    c1.execute()?;
    report(out, "push C1")?;
    stack.undo()?;
    report(out, "undo")?;
    stack.redo()?;
    report(out, "redo")?;
    stack.undo()?;
    stack.undo()?;
    report(out, "undo x2")?;
    c1.execute()?;
    report(out, "push C1")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_transcript() {
        let mut out = Vec::new();
        run_counter(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let status: Vec<&str> = text
            .lines()
            .filter(|line| line.contains("counter="))
            .collect();
        assert_eq!(
            status,
            vec![
                "start    counter=0 length=0 pointer=0",
                "push C1  counter=1 length=1 pointer=1",
                "push C1  counter=2 length=2 pointer=2",
                "undo     counter=1 length=2 pointer=1",
                "redo     counter=2 length=2 pointer=2",
                "undo x2  counter=0 length=2 pointer=0",
                "push C1  counter=1 length=1 pointer=1",
            ]
        );
        assert!(text.contains("Counter history (1/1)"));
    }
}

use std::io::Write;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::canvas::{Canvas, SQUARE_SIZE, draw_square, reset_command};
use crate::counter::run_counter;
use crate::error::{DemoError, Result};
use crate::render::{Frames, HistoryPanel};
use cmdstack::{Stack, StackConfig};

#[derive(Debug, Parser)]
#[command(
    name = "cmdstack-demo",
    about = "Walk through cmdstack histories and print each state",
    version
)]
pub struct Cli {
    /// Which scenario to run.
    #[arg(long, value_enum, default_value_t = Scenario::Both)]
    pub scenario: Scenario,

    /// Squares to draw in the canvas scenario.
    #[arg(long, default_value_t = 3)]
    pub squares: usize,

    /// Seed for square placement.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    #[arg(long, default_value_t = 16)]
    pub width: usize,

    #[arg(long, default_value_t = 6)]
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Per-command undo over a counter.
    Counter,
    /// Redo-from-start over a character canvas.
    Canvas,
    Both,
}

pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match cli.scenario {
        Scenario::Counter => run_counter(out),
        Scenario::Canvas => run_canvas(cli, out),
        Scenario::Both => {
            run_counter(out)?;
            writeln!(out)?;
            run_canvas(cli, out)
        }
    }
}

/// Draw squares, then jump around the history with `step_to`.
pub fn run_canvas(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    if cli.width < SQUARE_SIZE || cli.height < SQUARE_SIZE {
        return Err(DemoError::invalid(format!(
            "canvas must be at least {SQUARE_SIZE}x{SQUARE_SIZE}"
        )));
    }
    if cli.squares == 0 {
        return Err(DemoError::invalid("--squares must be at least 1"));
    }
    info!(
        squares = cli.squares,
        seed = cli.seed,
        "running canvas scenario"
    );

    let canvas = Canvas::shared(cli.width, cli.height);
    let stack = Stack::new(
        StackConfig::new()
            .with_redo_from_start(reset_command(&canvas))
            .with_label("canvas"),
    );
    let frames = Frames::attach(&stack, HistoryPanel::new().with_title("Canvas history"));
    let mut rng = SmallRng::seed_from_u64(cli.seed);

    let report = |out: &mut dyn Write, action: &str| -> Result<()> {
        writeln!(
            out,
            "{action}: length={} pointer={}",
            stack.len(),
            stack.pointer()
        )?;
        write!(out, "{}", canvas.borrow().render())?;
        if let Some(frame) = frames.take() {
            write!(out, "{frame}")?;
        }
        Ok(())
    };

    for ordinal in 0..cli.squares {
        draw_square(&canvas, &stack, &mut rng, ordinal).execute()?;
    }
    report(out, "drawn")?;

    stack.step_to(1)?;
    report(out, "step_to(1)")?;

    stack.step_to(stack.len())?;
    report(out, "step_to(len)")?;

    stack.undo()?;
    report(out, "undo")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("cmdstack-demo").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.scenario, Scenario::Both);
        assert_eq!(cli.squares, 3);
        assert_eq!((cli.width, cli.height), (16, 6));
    }

    #[test]
    fn canvas_scenario_prints_each_state() {
        let cli = cli(&["--scenario", "canvas", "--squares", "4", "--seed", "1"]);
        let mut out = Vec::new();
        run(&cli, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("drawn: length=4 pointer=4"));
        assert!(text.contains("step_to(1): length=4 pointer=1"));
        assert!(text.contains("step_to(len): length=4 pointer=4"));
        assert!(text.contains("undo: length=4 pointer=3"));
        assert!(text.contains("Canvas history (3/4)"));
    }

    #[test]
    fn rejects_tiny_canvas() {
        let cli = cli(&["--scenario", "canvas", "--width", "1"]);
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DemoError::InvalidArgument { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn rejects_zero_squares() {
        let cli = cli(&["--scenario", "canvas", "--squares", "0"]);
        assert!(run(&cli, &mut Vec::new()).is_err());
    }
}

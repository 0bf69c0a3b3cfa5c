//! Character canvas driven by a redo-from-start history.
//!
//! Squares have no inverse: undoing one means wiping the canvas and
//! redrawing everything still applied.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use cmdstack::{Command, Stack};
use rand::Rng;

pub const BLANK: char = '.';
pub const SQUARE_SIZE: usize = 2;
const GLYPHS: &[char] = &['#', '@', '%', '&', '*', '+', '=', 'o'];

pub type SharedCanvas = Rc<RefCell<Canvas>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    #[must_use]
    pub fn shared(width: usize, height: usize) -> SharedCanvas {
        Rc::new(RefCell::new(Self::new(width, height)))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Paint a `size`x`size` block; cells past the edge are clipped.
    pub fn fill_square(&mut self, x: usize, y: usize, size: usize, glyph: char) {
        for row in y..(y + size).min(self.height) {
            for col in x..(x + size).min(self.width) {
                self.cells[row * self.width + col] = glyph;
            }
        }
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Number of non-blank cells.
    #[must_use]
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| **c != BLANK).count()
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            let _ = writeln!(out, "{}", row.iter().collect::<String>());
        }
        out
    }
}

/// Reset action for the canvas history: wipe to blank.
pub fn reset_command(canvas: &SharedCanvas) -> Command {
    let canvas = Rc::clone(canvas);
    Command::builder(move || {
        canvas.borrow_mut().clear();
        Ok(())
    })
    .with_name("Clear canvas")
    .build()
}

/// Build a "draw square" command bound to `stack`.
///
/// Position is drawn from `rng` now, so every replay paints the same square.
pub fn draw_square(
    canvas: &SharedCanvas,
    stack: &Stack,
    rng: &mut impl Rng,
    ordinal: usize,
) -> Command {
    let (width, height) = {
        let c = canvas.borrow();
        (c.width(), c.height())
    };
    let x = rng.random_range(0..=width.saturating_sub(SQUARE_SIZE));
    let y = rng.random_range(0..=height.saturating_sub(SQUARE_SIZE));
    let glyph = GLYPHS[ordinal % GLYPHS.len()];

    let target = Rc::clone(canvas);
    Command::builder(move || {
        target.borrow_mut().fill_square(x, y, SQUARE_SIZE, glyph);
        Ok(())
    })
    .with_stack(stack)
    .with_name(format!("Square {glyph} at ({x}, {y})"))
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdstack::StackConfig;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn canvas_stack(canvas: &SharedCanvas) -> Stack {
        Stack::new(
            StackConfig::new()
                .with_redo_from_start(reset_command(canvas))
                .with_label("canvas"),
        )
    }

    #[test]
    fn fill_square_clips_at_edges() {
        let mut canvas = Canvas::new(3, 3);
        canvas.fill_square(2, 2, 2, '#');
        assert_eq!(canvas.painted(), 1);
        assert_eq!(canvas.get(2, 2), Some('#'));
        assert_eq!(canvas.get(3, 3), None);
    }

    #[test]
    fn render_has_one_line_per_row() {
        let mut canvas = Canvas::new(3, 2);
        canvas.fill_square(0, 0, 1, '#');
        assert_eq!(canvas.render(), "#..\n...\n");
    }

    #[test]
    fn square_position_is_fixed_at_construction() {
        let canvas = Canvas::shared(10, 6);
        let stack = canvas_stack(&canvas);
        let mut rng = SmallRng::seed_from_u64(42);
        let square = draw_square(&canvas, &stack, &mut rng, 0);

        square.execute().unwrap();
        let first = canvas.borrow().clone();
        canvas.borrow_mut().clear();
        square.execute().unwrap();
        assert_eq!(*canvas.borrow(), first);
        assert_eq!(first.painted(), SQUARE_SIZE * SQUARE_SIZE);
    }

    #[test]
    fn step_to_one_leaves_single_square() {
        let canvas = Canvas::shared(12, 6);
        let stack = canvas_stack(&canvas);
        let mut rng = SmallRng::seed_from_u64(7);
        let squares: Vec<_> = (0..3)
            .map(|i| draw_square(&canvas, &stack, &mut rng, i))
            .collect();
        for square in &squares {
            square.execute().unwrap();
        }
        assert_eq!((stack.len(), stack.pointer()), (3, 3));

        stack.step_to(1).unwrap();
        let picture = canvas.borrow().render();
        assert_eq!(canvas.borrow().painted(), SQUARE_SIZE * SQUARE_SIZE);
        assert!(picture.chars().all(|c| matches!(c, '#' | BLANK | '\n')));

        stack.step_to(3).unwrap();
        let picture = canvas.borrow().render();
        assert!(picture.contains('%'));
    }
}

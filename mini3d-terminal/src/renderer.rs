/// Half-block terminal canvas for true-color framebuffer output.
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

use mini3d_core::Framebuffer;

/// Presents an ARGB framebuffer on a character grid. Each terminal cell
/// shows two vertically stacked pixels via the upper-half-block glyph:
/// the foreground color is the top pixel, the background the bottom one.
/// The backing framebuffer is therefore twice as tall as the cell grid.
pub struct TerminalCanvas {
    cols: usize,
    rows: usize,
}

impl TerminalCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Framebuffer dimensions matching this canvas.
    pub fn frame_size(&self) -> (usize, usize) {
        (self.cols, self.rows * 2)
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Queues the whole frame; the caller flushes once per tick.
    pub fn draw<W: Write>(&self, frame: &Framebuffer, out: &mut W) -> std::io::Result<()> {
        let width = frame.width().min(self.cols);
        let rows = (frame.height() / 2).min(self.rows);

        for row in 0..rows {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for x in 0..width {
                let top = rgb(frame.pixel(x, row * 2));
                let bottom = rgb(frame.pixel(x, row * 2 + 1));
                out.queue(SetForegroundColor(top))?;
                out.queue(SetBackgroundColor(bottom))?;
                out.queue(Print('\u{2580}'))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn rgb(argb: u32) -> Color {
    Color::Rgb {
        r: (argb >> 16) as u8,
        g: (argb >> 8) as u8,
        b: argb as u8,
    }
}

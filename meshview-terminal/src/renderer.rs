/// Presents a rendered color buffer in the terminal
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::raster::ColorBuffer;
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

fn term_color(c: meshview_core::Color) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Draws two framebuffer rows per terminal line using 24-bit color.
pub struct TerminalPresenter {
    origin_row: u16,
}

impl TerminalPresenter {
    pub fn new(origin_row: u16) -> Self {
        Self { origin_row }
    }

    /// Framebuffer size that fills a terminal of `cols` x `rows` cells,
    /// leaving the rows above the origin for the status line.
    pub fn framebuffer_size(&self, cols: u16, rows: u16) -> (usize, usize) {
        let usable = rows.saturating_sub(self.origin_row) as usize;
        (cols as usize, usable * 2)
    }

    pub fn draw<W: Write>(&self, buffer: &ColorBuffer, writer: &mut W) -> std::io::Result<()> {
        let width = buffer.width();
        let background = meshview_core::Color::BLACK;
        let mut last: Option<(meshview_core::Color, meshview_core::Color)> = None;

        for (line, y) in (0..buffer.height()).step_by(2).enumerate() {
            writer.queue(cursor::MoveTo(0, self.origin_row + line as u16))?;
            for x in 0..width {
                let top = buffer.get(x, y).unwrap_or(background);
                let bottom = buffer.get(x, y + 1).unwrap_or(background);

                // Only emit color changes.
                if last != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(term_color(top)))?;
                    writer.queue(SetBackgroundColor(term_color(bottom)))?;
                    last = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_size_reserves_status_row() {
        let presenter = TerminalPresenter::new(1);
        assert_eq!(presenter.framebuffer_size(80, 25), (80, 48));
        assert_eq!(presenter.framebuffer_size(80, 0), (80, 0));
    }

    #[test]
    fn test_draw_emits_one_glyph_per_cell() {
        let buffer = ColorBuffer::new(3, 4, meshview_core::Color::WHITE);
        let mut out = Vec::new();
        TerminalPresenter::new(0).draw(&buffer, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }
}

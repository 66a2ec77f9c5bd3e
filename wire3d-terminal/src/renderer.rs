/// Half-block character surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wire3d_core::RenderSurface;

/// A grid of terminal cells, each holding two vertically stacked pixels
pub struct TerminalSurface {
    columns: usize,
    rows: usize,
    pixels: Vec<bool>,
}

impl TerminalSurface {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            pixels: vec![false; columns * rows * 2],
        }
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        *self = Self::new(columns, rows);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    pub fn cell_size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.columns + x]
    }

    /// Character for one cell from its upper and lower pixel
    pub fn cell(&self, column: usize, row: usize) -> char {
        match (self.pixel(column, row * 2), self.pixel(column, row * 2 + 1)) {
            (true, true) => '█',
            (true, false) => '▀',
            (false, true) => '▄',
            (false, false) => ' ',
        }
    }

    pub fn line(&self, row: usize) -> String {
        (0..self.columns).map(|column| self.cell(column, row)).collect()
    }

    /// Queue the grid starting at terminal row `origin`
    pub fn draw<W: Write>(&self, writer: &mut W, origin: u16) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Cyan))?;
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, origin.saturating_add(row as u16)))?;
            writer.queue(Print(self.line(row)))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderSurface for TerminalSurface {
    fn size(&self) -> (usize, usize) {
        (self.columns, self.rows * 2)
    }

    fn draw_point(&mut self, x: f32, y: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (width, height) = self.size();
        if x < width && y < height {
            self.pixels[y * width + x] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_blocks() {
        let mut surface = TerminalSurface::new(3, 1);
        assert_eq!(surface.size(), (3, 2));
        surface.draw_point(0.0, 0.0);
        surface.draw_point(1.0, 1.0);
        surface.draw_point(2.0, 0.0);
        surface.draw_point(2.0, 1.0);
        assert_eq!(surface.line(0), "▀▄█");
    }

    #[test]
    fn test_out_of_range_points_ignored() {
        let mut surface = TerminalSurface::new(2, 2);
        surface.draw_point(-1.0, 0.0);
        surface.draw_point(2.0, 0.0);
        surface.draw_point(0.0, 4.0);
        assert_eq!(surface.line(0), "  ");
        assert_eq!(surface.line(1), "  ");
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut surface = TerminalSurface::new(2, 2);
        surface.draw_point(1.0, 3.0);
        let mut out = Vec::new();
        surface.draw(&mut out, 1).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" ▄"));
    }
}

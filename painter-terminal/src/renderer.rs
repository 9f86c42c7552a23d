/// Character-cell drawing surface for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use painter_core::{Rgb, Surface};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const MARKER: char = 'o';

/// World units visible across the shorter side of the canvas by default.
pub const DEFAULT_EXTENT: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: (u8, u8, u8),
}

/// Canvas that paints polygons straight into a character grid.
///
/// There is no depth buffer: a later fill overwrites whatever was there.
pub struct TerminalCanvas {
    width: usize,
    height: usize,
    extent: f64,
    cells: Vec<Option<Cell>>,
}

impl TerminalCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            extent: DEFAULT_EXTENT,
            cells: vec![None; width * height],
        }
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![None; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    /// Cells per world unit horizontally. A cell is twice as tall as wide.
    fn scale(&self) -> f64 {
        let square_width = self.width as f64;
        let square_height = self.height as f64 * 2.0;
        square_width.min(square_height) / self.extent
    }

    /// World (x, y) to fractional (column, row), y pointing up.
    fn to_cell(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = self.scale();
        (
            self.width as f64 / 2.0 + x * scale,
            self.height as f64 / 2.0 - y * scale / 2.0,
        )
    }

    fn set(&mut self, column: i64, row: i64, cell: Cell) {
        if column < 0 || row < 0 || column >= self.width as i64 || row >= self.height as i64 {
            return;
        }
        self.cells[row as usize * self.width + column as usize] = Some(cell);
    }

    pub fn glyph_at(&self, column: usize, row: usize) -> Option<char> {
        self.cells
            .get(row * self.width + column)
            .copied()
            .flatten()
            .map(|cell| cell.glyph)
    }

    /// Plain-text frame, one line per row.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            text.extend(row.iter().map(|cell| cell.map_or(' ', |c| c.glyph)));
            text.push('\n');
        }
        text
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(Cell { glyph, color: (r, g, b) }) => {
                        writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                        writer.queue(Print(glyph))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn shade_glyph(intensity: f64) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (intensity.clamp(0.0, 1.0) * last as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// Keep unlit faces visible against the terminal background.
fn visible_color(color: Rgb) -> (u8, u8, u8) {
    let (r, g, b) = color.to_rgb8();
    (r, g, b.max(48))
}

impl Surface for TerminalCanvas {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn fill_polygon(&mut self, points: [(f64, f64); 3], color: Rgb) {
        let [v0, v1, v2] = points.map(|(x, y)| self.to_cell(x, y));
        let cell = Cell {
            glyph: shade_glyph(color.b),
            color: visible_color(color),
        };

        // Bounding box, clipped to the canvas
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.set(x, y, cell);
                    }
                }
            }
        }
    }

    fn plot_point(&mut self, x: f64, y: f64, color: Rgb) {
        let (column, row) = self.to_cell(x, y);
        self.set(
            column.floor() as i64,
            row.floor() as i64,
            Cell {
                glyph: MARKER,
                color: color.to_rgb8(),
            },
        );
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-12 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 40x20 cells: 40 square units either way, 5 cells per world unit
    fn canvas() -> TerminalCanvas {
        TerminalCanvas::new(40, 20)
    }

    const BIG: [(f64, f64); 3] = [(-3.0, -3.0), (3.0, -3.0), (0.0, 3.0)];

    #[test]
    fn test_fill_covers_centre() {
        let mut canvas = canvas();
        canvas.fill_polygon(BIG, Rgb::blue(1.0));
        assert_eq!(canvas.glyph_at(20, 10), Some('@'));
        assert_eq!(canvas.glyph_at(0, 0), None);
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut canvas = canvas();
        let [a, b, c] = BIG;
        canvas.fill_polygon([a, c, b], Rgb::blue(0.0));
        assert_eq!(canvas.glyph_at(20, 10), Some('.'));
    }

    #[test]
    fn test_later_fill_overwrites() {
        let mut canvas = canvas();
        canvas.fill_polygon(BIG, Rgb::blue(1.0));
        canvas.fill_polygon(BIG, Rgb::blue(0.5));
        assert_eq!(canvas.glyph_at(20, 10), Some('+'));
    }

    #[test]
    fn test_begin_frame_clears() {
        let mut canvas = canvas();
        canvas.fill_polygon(BIG, Rgb::blue(1.0));
        canvas.begin_frame();
        assert!(canvas.to_text().chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_plot_point_and_clipping() {
        let mut canvas = canvas();
        canvas.plot_point(0.0, 0.0, Rgb::WHITE);
        assert_eq!(canvas.glyph_at(20, 10), Some(MARKER));

        // off-canvas geometry is ignored rather than wrapped
        canvas.plot_point(100.0, 100.0, Rgb::WHITE);
        canvas.fill_polygon([(50.0, 50.0), (60.0, 50.0), (55.0, 60.0)], Rgb::blue(1.0));
        let text = canvas.to_text();
        assert_eq!(text.chars().filter(|&c| c != ' ' && c != '\n').count(), 1);
        assert_eq!(text.lines().count(), 20);
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut canvas = TerminalCanvas::new(4, 3);
        canvas.plot_point(0.0, 0.0, Rgb::WHITE);
        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
        assert!(text.contains(MARKER));
    }
}

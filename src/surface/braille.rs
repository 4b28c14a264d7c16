use super::Surface;
use std::io::Write;

// Each terminal cell packs a 2x4 block of pixels into one braille glyph.
pub const CELL_WIDTH: usize = 2;
pub const CELL_HEIGHT: usize = 4;

const BRAILLE_BASE: u32 = 0x2800;
const NEXT_LINE: &[u8] = b"\x1b[1E";

#[derive(Clone, Copy)]
struct Cell {
    mask: u8,
    color: (u8, u8, u8),
}

pub struct BrailleCanvas {
    width: usize,
    height: usize,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    background: (u8, u8, u8),
    output_buf: Vec<u8>,
}

// Dot numbering:
// 1 4
// 2 5
// 3 6
// 7 8
fn dot_bit(dx: usize, dy: usize) -> u8 {
    match (dx, dy) {
        (0, 0) => 1 << 0,
        (0, 1) => 1 << 1,
        (0, 2) => 1 << 2,
        (0, 3) => 1 << 6,
        (1, 0) => 1 << 3,
        (1, 1) => 1 << 4,
        (1, 2) => 1 << 5,
        (1, 3) => 1 << 7,
        _ => 0,
    }
}

fn braille_char(mask: u8) -> char {
    char::from_u32(BRAILLE_BASE + mask as u32).unwrap_or(' ')
}

impl BrailleCanvas {
    fn set(&mut self, x: i32, y: i32, color: (u8, u8, u8)) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = (y / CELL_HEIGHT) * self.cols + x / CELL_WIDTH;
        let cell = &mut self.cells[idx];
        cell.mask |= dot_bit(x % CELL_WIDTH, y % CELL_HEIGHT);
        // Last writer wins the whole cell
        cell.color = color;
    }
}

impl Surface for BrailleCanvas {
    type Color = (u8, u8, u8);

    fn new(width: usize, height: usize, background: Self::Color) -> Self {
        let cols = width.div_ceil(CELL_WIDTH);
        let rows = height.div_ceil(CELL_HEIGHT);
        Self {
            width,
            height,
            cols,
            rows,
            cells: vec![
                Cell {
                    mask: 0,
                    color: background,
                };
                cols * rows
            ],
            background,
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    fn rgb_color(r: u8, g: u8, b: u8) -> Self::Color {
        (r, g, b)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, color: Self::Color, points: &[(i32, i32)]) {
        for &(x, y) in points {
            self.set(x, y, color);
        }
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Self::Color) {
        // Bresenham, clipped point by point
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn clear(&mut self, color: Self::Color) {
        self.background = color;
        self.cells.fill(Cell { mask: 0, color });
    }

    fn render(&mut self) -> std::io::Result<&[u8]> {
        self.output_buf.clear();
        let bg = self.background;

        for row in 0..self.rows {
            write!(self.output_buf, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
            let mut prev_color = None;

            for col in 0..self.cols {
                let cell = self.cells[row * self.cols + col];
                if cell.mask == 0 {
                    self.output_buf.push(b' ');
                    continue;
                }
                if prev_color != Some(cell.color) {
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        cell.color.0, cell.color.1, cell.color.2
                    )?;
                    prev_color = Some(cell.color);
                }
                let mut utf8 = [0u8; 4];
                self.output_buf
                    .extend_from_slice(braille_char(cell.mask).encode_utf8(&mut utf8).as_bytes());
            }

            self.output_buf.extend_from_slice(b"\x1b[0m");
            // Cursor to the start of the next line, no '\n' in the frame
            if row + 1 < self.rows {
                self.output_buf.extend_from_slice(NEXT_LINE);
            }
        }

        Ok(&self.output_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: (u8, u8, u8) = (255, 0, 0);
    const BLUE: (u8, u8, u8) = (0, 0, 255);

    fn mask_at(canvas: &BrailleCanvas, col: usize, row: usize) -> u8 {
        canvas.cells[row * canvas.cols + col].mask
    }

    #[test]
    fn cell_grid_rounds_up() {
        let canvas = BrailleCanvas::new(5, 9, (0, 0, 0));
        assert_eq!(canvas.cols, 3);
        assert_eq!(canvas.rows, 3);
    }

    #[test]
    fn plot_packs_dots_into_one_glyph() {
        let mut canvas = BrailleCanvas::new(4, 8, (0, 0, 0));
        canvas.plot(RED, &[(0, 0), (1, 3)]);
        assert_eq!(mask_at(&canvas, 0, 0), 0b1000_0001);
        assert_eq!(braille_char(mask_at(&canvas, 0, 0)), '\u{2881}');

        canvas.plot(RED, &[(3, 7)]);
        assert_eq!(mask_at(&canvas, 1, 1), 1 << 7);
    }

    #[test]
    fn plot_ignores_out_of_range_points() {
        let mut canvas = BrailleCanvas::new(4, 4, (0, 0, 0));
        canvas.plot(RED, &[(-1, 0), (0, -1), (4, 0), (0, 4)]);
        assert!(canvas.cells.iter().all(|c| c.mask == 0));
    }

    #[test]
    fn later_plot_takes_over_cell_color() {
        let mut canvas = BrailleCanvas::new(2, 4, (0, 0, 0));
        canvas.plot(RED, &[(0, 0)]);
        canvas.plot(BLUE, &[(1, 1)]);
        assert_eq!(canvas.cells[0].color, BLUE);
        assert_eq!(canvas.cells[0].mask, 0b0001_0001);
    }

    #[test]
    fn clear_resets_masks_and_background() {
        let mut canvas = BrailleCanvas::new(4, 4, (0, 0, 0));
        canvas.plot(RED, &[(0, 0), (3, 3)]);
        canvas.clear(BLUE);
        assert!(canvas.cells.iter().all(|c| c.mask == 0));

        let frame = String::from_utf8(canvas.render().unwrap().to_vec()).unwrap();
        assert_eq!(frame, "\x1b[48;2;0;0;255m  \x1b[0m");
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut canvas = BrailleCanvas::new(8, 4, (0, 0, 0));
        canvas.line(0, 0, 7, 3, RED);
        assert_ne!(mask_at(&canvas, 0, 0) & dot_bit(0, 0), 0);
        assert_ne!(mask_at(&canvas, 3, 0) & dot_bit(1, 3), 0);
    }

    #[test]
    fn render_emits_color_once_per_run() {
        let mut canvas = BrailleCanvas::new(4, 8, (0, 0, 0));
        canvas.plot(RED, &[(0, 0), (2, 0), (0, 4)]);

        let frame = String::from_utf8(canvas.render().unwrap().to_vec()).unwrap();
        assert!(!frame.contains('\n'));
        let lines: Vec<&str> = frame.split("\x1b[1E").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "\x1b[48;2;0;0;0m\x1b[38;2;255;0;0m\u{2801}\u{2801}\x1b[0m"
        );
        assert_eq!(lines[1], "\x1b[48;2;0;0;0m\x1b[38;2;255;0;0m\u{2801} \x1b[0m");
    }
}

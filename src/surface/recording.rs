use super::Surface;

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Plot((u8, u8, u8), Vec<(i32, i32)>),
    Line(i32, i32, i32, i32, (u8, u8, u8)),
    Clear((u8, u8, u8)),
}

// Records every draw call instead of rasterizing it.
pub struct RecordingSurface {
    width: usize,
    height: usize,
    pub draws: Vec<Draw>,
    frame: Vec<u8>,
}

impl RecordingSurface {
    pub fn plots(&self) -> impl Iterator<Item = (&(u8, u8, u8), &Vec<(i32, i32)>)> {
        self.draws.iter().filter_map(|draw| match draw {
            Draw::Plot(color, points) => Some((color, points)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    type Color = (u8, u8, u8);

    fn new(width: usize, height: usize, _background: Self::Color) -> Self {
        Self {
            width,
            height,
            draws: Vec::new(),
            frame: Vec::new(),
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
        self.draws.push(Draw::Plot(color, points.to_vec()));
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Self::Color) {
        self.draws.push(Draw::Line(x0, y0, x1, y1, color));
    }

    fn clear(&mut self, color: Self::Color) {
        self.draws.clear();
        self.draws.push(Draw::Clear(color));
    }

    fn render(&mut self) -> std::io::Result<&[u8]> {
        self.frame = format!("{} draws", self.draws.len()).into_bytes();
        Ok(&self.frame)
    }
}

pub mod braille;
#[cfg(test)]
pub mod recording;

// Drawing target that turns batched colored points into one text frame.
// Callers only ever submit in-bounds coordinates.
pub trait Surface {
    type Color: Copy + PartialEq;

    fn new(width: usize, height: usize, background: Self::Color) -> Self
    where
        Self: Sized;

    // True-color triple to this surface's color token
    fn rgb_color(r: u8, g: u8, b: u8) -> Self::Color;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    // One batch, one color
    fn plot(&mut self, color: Self::Color, points: &[(i32, i32)]);

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Self::Color);

    fn clear(&mut self, color: Self::Color);

    // Complete frame for a single write
    fn render(&mut self) -> std::io::Result<&[u8]>;
}

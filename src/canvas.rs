use embedded_graphics::mono_font::ascii::FONT_7X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::config::Color;

// ============================================================================
// CANVAS
// ============================================================================

/// RGBA8 frame borrowed from an image buffer or a window surface.
///
/// Every write overwrites the destination pixel; coordinates outside the
/// frame are dropped.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| (y * self.width + x) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let idx = self.index(x, y)?;
        let px = self.frame.get(idx..idx + 4)?;
        Some(Color {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            if let Some(px) = self.frame.get_mut(idx..idx + 4) {
                px.copy_from_slice(&color.as_array());
            }
        }
    }

    /// Pixels `[x1, x2)` on row `y`.
    pub fn h_line(&mut self, x1: i32, y: i32, x2: i32, color: Color) {
        for x in x1..x2 {
            self.set_pixel(x, y, color);
        }
    }

    /// Pixels `[y1, y2)` on column `x`.
    pub fn v_line(&mut self, x: i32, y1: i32, y2: i32, color: Color) {
        for y in y1..y2 {
            self.set_pixel(x, y, color);
        }
    }

    /// Fill `[x, x + width) × [y, y + height)`, one column at a time.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for xn in x..x.saturating_add(width) {
            self.v_line(xn, y, y.saturating_add(height), color);
        }
    }

    /// Draw `text` in the 7x13 bitmap font with its baseline at `(x, y)`.
    pub fn label(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let style = MonoTextStyle::new(&FONT_7X13, BinaryColor::On);
        let mut ink = Ink {
            canvas: self,
            color,
        };
        // Ink never fails
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Alphabetic)
            .draw(&mut ink);
    }
}

/// Maps the font's lit pixels onto the canvas in a single color
struct Ink<'c, 'a> {
    canvas: &'c mut Canvas<'a>,
    color: Color,
}

impl OriginDimensions for Ink<'_, '_> {
    fn size(&self) -> Size {
        Size::new(self.canvas.width as u32, self.canvas.height as u32)
    }
}

impl DrawTarget for Ink<'_, '_> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, lit) in pixels {
            if lit.is_on() {
                self.canvas.set_pixel(point.x, point.y, self.color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: usize, height: usize) -> Vec<u8> {
        vec![0; width * height * 4]
    }

    #[test]
    fn h_line_is_half_open() {
        let mut buf = frame(10, 3);
        let mut canvas = Canvas::new(&mut buf, 10, 3);
        canvas.h_line(2, 1, 5, Color::RED);
        assert_eq!(canvas.pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(2, 1), Some(Color::RED));
        assert_eq!(canvas.pixel(4, 1), Some(Color::RED));
        assert_eq!(canvas.pixel(5, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn v_line_is_half_open() {
        let mut buf = frame(3, 10);
        let mut canvas = Canvas::new(&mut buf, 3, 10);
        canvas.v_line(1, 0, 4, Color::BLUE);
        assert_eq!(canvas.pixel(1, 3), Some(Color::BLUE));
        assert_eq!(canvas.pixel(1, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn rect_fills_exact_area() {
        let mut buf = frame(8, 8);
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        canvas.fill_rect(2, 3, 3, 2, Color::GREEN);
        let filled = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(Color::GREEN))
            .count();
        assert_eq!(filled, 6);
        assert_eq!(canvas.pixel(2, 3), Some(Color::GREEN));
        assert_eq!(canvas.pixel(4, 4), Some(Color::GREEN));
        assert_eq!(canvas.pixel(5, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn writes_outside_are_clipped() {
        let mut buf = frame(4, 4);
        let mut canvas = Canvas::new(&mut buf, 4, 4);
        canvas.fill_rect(-3, -3, 5, 5, Color::ORANGE);
        canvas.h_line(2, 10, 100, Color::ORANGE);
        canvas.v_line(-1, 0, 4, Color::ORANGE);
        canvas.fill_rect(i32::MAX - 1, 0, 10, 10, Color::ORANGE);
        assert_eq!(canvas.pixel(1, 1), Some(Color::ORANGE));
        assert_eq!(canvas.pixel(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(-1, 0), None);
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn overwrite_does_not_blend() {
        let mut buf = frame(2, 2);
        let mut canvas = Canvas::new(&mut buf, 2, 2);
        canvas.fill_rect(0, 0, 2, 2, Color::WHITE);
        canvas.set_pixel(0, 0, Color::TRANSPARENT);
        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn label_sits_on_baseline() {
        let (w, h) = (40, 20);
        let mut buf = frame(w, h);
        let mut canvas = Canvas::new(&mut buf, w, h);
        canvas.label(2, 12, "88", Color::DARK);

        let lit: Vec<(i32, i32)> = (0..h as i32)
            .flat_map(|y| (0..w as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(Color::DARK))
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| (2..2 + 14).contains(&x) && y <= 12 + 2));
        // nothing else is touched
        assert!((0..h as i32)
            .flat_map(|y| (0..w as i32).map(move |x| (x, y)))
            .all(|(x, y)| {
                let px = canvas.pixel(x, y);
                px == Some(Color::DARK) || px == Some(Color::TRANSPARENT)
            }));
    }

    #[test]
    fn label_off_canvas_is_clipped() {
        let mut buf = frame(5, 5);
        let mut canvas = Canvas::new(&mut buf, 5, 5);
        canvas.label(-50, -50, "clipped", Color::GRAY);
        canvas.label(100, 100, "clipped", Color::GRAY);
        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
    }
}

//! The drawing surface the scene renders onto, and its nannou backend.

use nannou::color::Srgb;
use nannou::geom::{pt2, Point2, Rect};
use nannou::text::{self, Font};
use nannou::Draw;

use crate::text_fit::TextMetrics;

pub type Color = Srgb<u8>;

/// Abstract drawing target. Every position is in screen coordinates:
/// origin top-left, Y growing down.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn line(&mut self, start: Point2, end: Point2, color: Color);
    fn circle(&mut self, center: Point2, radius: f32, color: Color);
    fn rect(&mut self, pos: Point2, size: Point2, color: Color);
    fn triangle(&mut self, a: Point2, b: Point2, c: Point2, color: Color);
    /// `pos` is the top-left corner of the text.
    fn text(&mut self, text: &str, pos: Point2, font_size: u32, color: Color);
}

const LINE_WEIGHT: f32 = 2.0;

/// Draws into a nannou frame, mapping screen space onto nannou's centred,
/// Y-up window space.
pub struct NannouSurface<'a> {
    draw: &'a Draw,
    win: Rect,
}

impl<'a> NannouSurface<'a> {
    pub fn new(draw: &'a Draw, win: Rect) -> Self {
        NannouSurface { draw, win }
    }

    fn to_window(&self, p: Point2) -> Point2 {
        to_window(self.win, p)
    }
}

/// Screen space to nannou window space.
pub fn to_window(win: Rect, p: Point2) -> Point2 {
    pt2(win.left() + p.x, win.top() - p.y)
}

/// nannou window space to screen space.
pub fn to_screen(win: Rect, p: Point2) -> Point2 {
    pt2(p.x - win.left(), win.top() - p.y)
}

impl Surface for NannouSurface<'_> {
    fn clear(&mut self, color: Color) {
        self.draw.background().color(color);
    }

    fn line(&mut self, start: Point2, end: Point2, color: Color) {
        self.draw
            .line()
            .start(self.to_window(start))
            .end(self.to_window(end))
            .weight(LINE_WEIGHT)
            .color(color);
    }

    fn circle(&mut self, center: Point2, radius: f32, color: Color) {
        self.draw
            .ellipse()
            .xy(self.to_window(center))
            .radius(radius)
            .color(color);
    }

    fn rect(&mut self, pos: Point2, size: Point2, color: Color) {
        let center = self.to_window(pos + size / 2.0);
        self.draw
            .rect()
            .xy(center)
            .w_h(size.x, size.y)
            .color(color);
    }

    fn triangle(&mut self, a: Point2, b: Point2, c: Point2, color: Color) {
        self.draw
            .tri()
            .points(self.to_window(a), self.to_window(b), self.to_window(c))
            .color(color);
    }

    fn text(&mut self, text: &str, pos: Point2, font_size: u32, color: Color) {
        // lay out in a box as wide as the window, anchored at its top-left
        let size = pt2(self.win.w(), font_size as f32 * 1.5);
        let center = self.to_window(pos + size / 2.0);
        self.draw
            .text(text)
            .xy(center)
            .wh(size)
            .font_size(font_size)
            .no_line_wrap()
            .left_justify()
            .align_text_top()
            .color(color);
    }
}

/// Advance-width metrics of nannou's bundled font.
pub struct FontMetrics {
    font: Font,
}

impl FontMetrics {
    pub fn new() -> Self {
        FontMetrics {
            font: text::font::default_notosans(),
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMetrics for FontMetrics {
    fn measure_width(&self, text: &str, font_size: u32) -> f32 {
        let scale = text::pt_to_scale(font_size);
        self.font
            .glyphs_for(text.chars())
            .map(|glyph| glyph.scaled(scale).h_metrics().advance_width)
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Op {
        Clear(Color),
        Line(Point2, Point2, Color),
        Circle(Point2, f32, Color),
        Rect(Point2, Point2, Color),
        Triangle(Point2, Point2, Point2, Color),
        Text(String, Point2, u32, Color),
    }

    /// Remembers every call, in order.
    #[derive(Default)]
    pub(crate) struct Recording {
        pub ops: Vec<Op>,
    }

    impl Surface for Recording {
        fn clear(&mut self, color: Color) {
            self.ops.push(Op::Clear(color));
        }
        fn line(&mut self, start: Point2, end: Point2, color: Color) {
            self.ops.push(Op::Line(start, end, color));
        }
        fn circle(&mut self, center: Point2, radius: f32, color: Color) {
            self.ops.push(Op::Circle(center, radius, color));
        }
        fn rect(&mut self, pos: Point2, size: Point2, color: Color) {
            self.ops.push(Op::Rect(pos, size, color));
        }
        fn triangle(&mut self, a: Point2, b: Point2, c: Point2, color: Color) {
            self.ops.push(Op::Triangle(a, b, c, color));
        }
        fn text(&mut self, text: &str, pos: Point2, font_size: u32, color: Color) {
            self.ops.push(Op::Text(text.to_string(), pos, font_size, color));
        }
    }

    #[test]
    fn screen_and_window_space_round_trip() {
        let win = Rect::from_w_h(1080.0, 1920.0);

        assert_eq!(to_window(win, pt2(0.0, 0.0)), pt2(-540.0, 960.0));
        assert_eq!(to_window(win, pt2(540.0, 960.0)), pt2(0.0, 0.0));
        assert_eq!(to_screen(win, pt2(540.0, -960.0)), pt2(1080.0, 1920.0));
    }

    #[test]
    fn font_metrics_grow_with_text_and_size() {
        let m = FontMetrics::new();
        let short = m.measure_width("play", 48);
        let long = m.measure_width("pause and more", 48);

        assert_eq!(m.measure_width("", 48), 0.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!(m.measure_width("play", 96) > short);
    }
}

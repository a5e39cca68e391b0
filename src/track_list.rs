//! The track rows inside the background panel.

use nannou::color::named::{BLACK, WHITE, YELLOW};
use nannou::geom::{pt2, Point2};
use tracing::trace;

use crate::render_drawing::Surface;
use crate::text_fit::{fit, TextMetrics};
use crate::ui::BBox;

pub const ROW_PAD: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLayout {
    /// Gap around the rows and between them.
    pub pad: f32,
    pub text_pad: f32,
    pub font_size: u32,
    pub origin: Point2,
    pub row_size: Point2,
}

impl TrackLayout {
    pub fn new(panel: BBox, pad: f32, font_size: u32) -> Self {
        let font = font_size as f32;
        TrackLayout {
            pad,
            text_pad: (font_size / 2) as f32,
            font_size,
            origin: panel.pos + pt2(pad, pad),
            row_size: pt2(panel.size.x - 2.0 * pad, font * 2.0),
        }
    }

    /// Width available to a label.
    pub fn budget(&self) -> f32 {
        self.row_size.x - 2.0 * self.text_pad
    }

    pub fn row_pos(&self, index: usize) -> Point2 {
        self.origin + pt2(0.0, index as f32 * (self.row_size.y + self.pad))
    }
}

/// Labels cut to fit their rows. Built once per render session.
#[derive(Debug, Clone)]
pub struct TrackRows {
    layout: TrackLayout,
    labels: Vec<String>,
}

impl TrackRows {
    pub fn new(titles: &[String], layout: TrackLayout, metrics: &impl TextMetrics) -> Self {
        let labels = titles
            .iter()
            .map(|title| {
                let label = fit(metrics, title, layout.font_size, layout.budget());
                trace!(%title, %label, "truncated track");
                label
            })
            .collect();
        TrackRows { layout, labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    pub fn draw(&self, now_playing: Option<usize>, surface: &mut impl Surface) {
        let text_offset = pt2(self.layout.text_pad, self.layout.text_pad);
        for (i, label) in self.labels.iter().enumerate() {
            let pos = self.layout.row_pos(i);
            let fill = if now_playing == Some(i) { YELLOW } else { WHITE };
            surface.rect(pos, self.layout.row_size, fill);
            surface.text(label, pos + text_offset, self.layout.font_size, BLACK);
        }
    }
}

//! Layout of the player screen: a panel for the track list, a close
//! button, a play/pause button and two volume arrows.

use nannou::color::named::{DARKGRAY, MAROON, RED, WHITE};
use nannou::geom::{pt2, Point2};

use crate::actions::{Action, PAUSED_COLOR, PAUSE_LABEL, PLAY_LABEL};
use crate::coordination::Coordinator;
use crate::geometry::is_counter_clockwise;
use crate::scene::{Drawable, Scene, SceneError, Shape, WidgetId};
use crate::text_fit::TextMetrics;

pub const FONT_SIZE: u32 = 48;
pub const CLOSE_FONT_SIZE: u32 = FONT_SIZE + 20;
pub const PLAY_FONT_SIZE: u32 = FONT_SIZE + 10;
pub const CLOSE_LABEL: &str = "close";

const SCENE_CAPACITY: usize = 7;
const CLOSE_MARGIN: f32 = 90.0;
const BUTTON_PAD: Point2 = nannou::glam::const_vec2!([32.0, 16.0]);
const PLAY_GAP: f32 = 30.0;
const ARROW_SIZE: f32 = 80.0;
const ARROW_GAP: f32 = 16.0;

/// Position and size of a rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub pos: Point2,
    pub size: Point2,
}

impl BBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        BBox {
            pos: pt2(x, y),
            size: pt2(w, h),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Grows the box by `pad` on every side.
    pub fn padded(&self, pad: Point2) -> Self {
        BBox {
            pos: self.pos - pad,
            size: self.size + pad * 2.0,
        }
    }

    fn shape(&self) -> Shape {
        Shape::Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// The built scene plus handles to the widgets callers care about.
#[derive(Debug, Clone)]
pub struct PlayerScene {
    pub scene: Scene,
    pub panel: BBox,
    pub close_button: WidgetId,
    pub play_button: WidgetId,
    pub play_label: WidgetId,
    pub volume_up: WidgetId,
    pub volume_down: WidgetId,
}

/// Builds every widget for a `width` x `height` screen, in draw order.
pub fn build_player_scene(
    width: f32,
    height: f32,
    metrics: &impl TextMetrics,
    ctx: &Coordinator,
) -> Result<PlayerScene, SceneError> {
    let mut scene = Scene::with_capacity(SCENE_CAPACITY);

    let panel_w = (width * 0.8).floor();
    let panel_h = (height * 0.5).floor();
    let panel = BBox::new(
        ((width - panel_w) / 2.0).floor(),
        ((height - panel_h) / 2.0).floor(),
        panel_w,
        panel_h,
    );
    scene.push(Drawable::new(panel.shape(), DARKGRAY))?;

    // close: hit box first so the label draws on top of it
    let close_w = metrics.measure_width(CLOSE_LABEL, CLOSE_FONT_SIZE);
    let close_text = BBox::new(
        width - close_w - CLOSE_MARGIN,
        CLOSE_MARGIN,
        close_w,
        CLOSE_FONT_SIZE as f32,
    );
    let close_button = scene.push(
        Drawable::new(close_text.padded(BUTTON_PAD).shape(), RED)
            .with_action(Action::request_close(ctx)),
    )?;
    scene.push(Drawable::new(
        Shape::Text {
            pos: close_text.pos,
            text: CLOSE_LABEL.to_string(),
            font_size: CLOSE_FONT_SIZE,
        },
        WHITE,
    ))?;

    // play/pause: sized for the wider of the two labels
    let play_w = metrics
        .measure_width(PAUSE_LABEL, PLAY_FONT_SIZE)
        .max(metrics.measure_width(PLAY_LABEL, PLAY_FONT_SIZE));
    let play_h = PLAY_FONT_SIZE as f32;
    let play_text = BBox::new(
        ((width - play_w) / 2.0).floor(),
        panel.pos.y - play_h - PLAY_GAP,
        play_w,
        play_h,
    );
    let play_button = scene.push(
        Drawable::new(play_text.padded(BUTTON_PAD).shape(), PAUSED_COLOR)
            .with_action(Action::toggle_playback(ctx)),
    )?;
    let play_label = scene.push(Drawable::new(
        Shape::Text {
            pos: play_text.pos,
            text: PLAY_LABEL.to_string(),
            font_size: PLAY_FONT_SIZE,
        },
        WHITE,
    ))?;
    scene.link(play_button, play_label)?;

    // volume arrows under the panel's left edge
    let x = panel.pos.x;
    let w = ARROW_SIZE;
    let y = panel.bottom() + ARROW_GAP;
    let (a, b, c) = (pt2(x, y + w), pt2(x + w, y + w), pt2(x + w / 2.0, y));
    debug_assert!(is_counter_clockwise(a, b, c));
    let volume_up = scene.push(
        Drawable::new(Shape::Triangle { a, b, c }, MAROON)
            .with_action(Action::increase_volume(ctx)),
    )?;

    let y = y + w + ARROW_GAP;
    let (a, b, c) = (pt2(x + w / 2.0, y + w), pt2(x + w, y), pt2(x, y));
    debug_assert!(is_counter_clockwise(a, b, c));
    let volume_down = scene.push(
        Drawable::new(Shape::Triangle { a, b, c }, MAROON)
            .with_action(Action::decrease_volume(ctx)),
    )?;

    Ok(PlayerScene {
        scene,
        panel,
        close_button,
        play_button,
        play_label,
        volume_up,
        volume_down,
    })
}

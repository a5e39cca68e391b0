//! The widget arena: every drawable the player shows, in draw order.
//!
//! Widgets are addressed by [`WidgetId`], a stable index handed out at
//! construction. A widget may hold one `linked` id naming another widget
//! its action mutates; nothing follows that link more than one hop.

use nannou::geom::Point2;
use thiserror::Error;
use tracing::debug;

use crate::actions::Action;
use crate::geometry::{point_in_circle, point_in_rect, point_in_triangle};
use crate::render_drawing::{Color, Surface};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene is full ({capacity} widgets)")]
    Full { capacity: usize },

    #[error("no widget with id {0:?}")]
    UnknownWidget(WidgetId),

    #[error("widget {0:?} cannot link to itself")]
    SelfLink(WidgetId),

    #[error("widget {0:?} is not a text label")]
    NotALabel(WidgetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(usize);

impl WidgetId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        start: Point2,
        end: Point2,
    },
    Circle {
        center: Point2,
        radius: f32,
    },
    Rect {
        pos: Point2,
        size: Point2,
    },
    /// Vertices wound counter-clockwise on screen.
    Triangle {
        a: Point2,
        b: Point2,
        c: Point2,
    },
    Text {
        pos: Point2,
        text: String,
        font_size: u32,
    },
}

impl Shape {
    /// Hit test. Lines and text never hit.
    pub fn contains(&self, p: Point2) -> bool {
        match *self {
            Shape::Line { .. } | Shape::Text { .. } => false,
            Shape::Circle { center, radius } => point_in_circle(p, center, radius),
            Shape::Rect { pos, size } => point_in_rect(p, pos, size),
            Shape::Triangle { a, b, c } => point_in_triangle(p, a, b, c),
        }
    }

    pub fn draw(&self, color: Color, surface: &mut impl Surface) {
        match self {
            Shape::Line { start, end } => surface.line(*start, *end, color),
            Shape::Circle { center, radius } => surface.circle(*center, *radius, color),
            Shape::Rect { pos, size } => surface.rect(*pos, *size, color),
            Shape::Triangle { a, b, c } => surface.triangle(*a, *b, *c, color),
            Shape::Text {
                pos,
                text,
                font_size,
            } => surface.text(text, *pos, *font_size, color),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Drawable {
    pub shape: Shape,
    pub color: Color,
    action: Option<Action>,
    linked: Option<WidgetId>,
}

impl Drawable {
    pub fn new(shape: Shape, color: Color) -> Self {
        Drawable {
            shape,
            color,
            action: None,
            linked: None,
        }
    }

    /// Makes the widget tappable.
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.action.is_some()
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn linked(&self) -> Option<WidgetId> {
        self.linked
    }

    pub fn touches(&self, p: Point2) -> bool {
        self.is_interactive() && self.shape.contains(p)
    }
}

/// Fixed-capacity collection of widgets, drawn in insertion order.
#[derive(Debug, Clone)]
pub struct Scene {
    widgets: Vec<Drawable>,
    capacity: usize,
}

impl Scene {
    pub fn with_capacity(capacity: usize) -> Self {
        Scene {
            widgets: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, drawable: Drawable) -> Result<WidgetId, SceneError> {
        if self.widgets.len() >= self.capacity {
            return Err(SceneError::Full {
                capacity: self.capacity,
            });
        }
        self.widgets.push(drawable);
        Ok(WidgetId(self.widgets.len() - 1))
    }

    /// Points `from`'s link at `to`.
    pub fn link(&mut self, from: WidgetId, to: WidgetId) -> Result<(), SceneError> {
        if from == to {
            return Err(SceneError::SelfLink(from));
        }
        self.get(to)?;
        self.get_mut(from)?.linked = Some(to);
        Ok(())
    }

    pub fn get(&self, id: WidgetId) -> Result<&Drawable, SceneError> {
        self.widgets.get(id.0).ok_or(SceneError::UnknownWidget(id))
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Result<&mut Drawable, SceneError> {
        self.widgets
            .get_mut(id.0)
            .ok_or(SceneError::UnknownWidget(id))
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Drawable)> {
        self.widgets
            .iter()
            .enumerate()
            .map(|(i, w)| (WidgetId(i), w))
    }

    pub fn text(&self, id: WidgetId) -> Result<&str, SceneError> {
        match &self.get(id)?.shape {
            Shape::Text { text, .. } => Ok(text),
            _ => Err(SceneError::NotALabel(id)),
        }
    }

    pub fn set_text(&mut self, id: WidgetId, value: &str) -> Result<(), SceneError> {
        match &mut self.get_mut(id)?.shape {
            Shape::Text { text, .. } => {
                text.clear();
                text.push_str(value);
                Ok(())
            }
            _ => Err(SceneError::NotALabel(id)),
        }
    }

    pub fn set_color(&mut self, id: WidgetId, color: Color) -> Result<(), SceneError> {
        self.get_mut(id)?.color = color;
        Ok(())
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        for widget in &self.widgets {
            widget.shape.draw(widget.color, surface);
        }
    }

    /// Runs the action of every interactive widget under `p`, in draw
    /// order. Overlapping widgets all fire. Returns the ids that fired.
    pub fn dispatch_tap(&mut self, p: Point2) -> Vec<WidgetId> {
        let mut fired = Vec::new();
        for i in 0..self.widgets.len() {
            let id = WidgetId(i);
            let action = match &self.widgets[i] {
                widget if widget.touches(p) => widget.action.clone(),
                _ => None,
            };
            if let Some(action) = action {
                action.run(self, id);
                debug!(widget = i, "action called");
                fired.push(id);
            }
        }
        fired
    }
}

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    color::Color,
    error::Error,
    math::{Length, Point, Scaled, Size},
    scene::{Pen, Scene, Target},
    shape::Stroke,
    ui::{RedrawStatus, Widget},
};

/// Selects which diagonal(s) of the bounds are drawn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Direction {
    /// From the top-left corner to the bottom-right corner.
    LeftUpToRightDown,
    /// From the top-right corner to the bottom-left corner.
    RightUpToLeftDown,
    /// Both diagonals.
    Cross,
}

impl Default for Direction {
    fn default() -> Self {
        Self::LeftUpToRightDown
    }
}

impl Direction {
    /// Returns the segments to draw within bounds of `size`, with the origin
    /// at the top-left corner.
    pub fn segments(
        self,
        size: Size<f32, Scaled>,
    ) -> impl Iterator<Item = (Point<f32, Scaled>, Point<f32, Scaled>)> {
        let descending = (Point::origin(), Point::new(size.width, size.height));
        let ascending = (Point::new(size.width, 0.), Point::new(0., size.height));
        let (first, second) = match self {
            Self::LeftUpToRightDown => (descending, None),
            Self::RightUpToLeftDown => (ascending, None),
            Self::Cross => (descending, Some(ascending)),
        };
        std::iter::once(first).chain(second)
    }
}

/// The appearance of a [`DiagonalLine`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DiagonalLineStyle {
    /// The color of the line(s).
    pub line_color: Color,
    /// The width of the line(s). Must be greater than 0.
    pub line_width: f32,
    /// Which diagonal(s) to draw.
    pub direction: Direction,
}

impl Default for DiagonalLineStyle {
    fn default() -> Self {
        Self {
            line_color: Color::BLACK,
            line_width: 1.,
            direction: Direction::default(),
        }
    }
}

impl DiagonalLineStyle {
    /// Builder-style function. Sets `line_color` and return self.
    #[must_use]
    pub const fn line_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    /// Builder-style function. Sets `line_width` and return self. The width
    /// is validated when the style is applied.
    #[must_use]
    pub const fn line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Builder-style function. Sets `direction` and return self.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    fn stroke(&self) -> Stroke {
        Stroke::new(self.line_color).line_width(Length::new(self.line_width))
    }
}

fn validate_line_width(width: f32) -> crate::Result<f32> {
    // Written to reject NaN as well.
    if width > 0. {
        Ok(width)
    } else {
        tracing::debug!(width, "rejecting line width");
        Err(Error::InvalidConfiguration {
            property: "line_width",
            value: width,
        })
    }
}

/// The pen a [`DiagonalLine`] draws with. Either stale (no pen held) or
/// current (a pen matching the style's color and width).
#[derive(Debug, Default)]
struct StrokeCache {
    pen: Option<Pen>,
}

impl StrokeCache {
    fn is_current(&self) -> bool {
        self.pen.is_some()
    }

    /// Releases the held pen, if any.
    fn invalidate(&mut self) {
        self.pen = None;
    }

    fn current(&mut self, scene: &Scene, style: &DiagonalLineStyle) -> &Pen {
        self.pen
            .get_or_insert_with(|| scene.create_pen(style.stroke()))
    }
}

/// A transparent widget that strokes one or both diagonals of its bounds.
///
/// ```rust
/// # use diagonal_line::prelude::*;
/// let mut line = DiagonalLine::new();
/// line.set_direction(Direction::Cross);
/// line.set_line_color(Color::RED);
/// assert!(line.set_line_width(0.).is_err());
/// assert_eq!(line.line_width(), 1.);
/// ```
#[derive(Debug, Default)]
pub struct DiagonalLine {
    style: DiagonalLineStyle,
    pen: StrokeCache,
    redraw: RedrawStatus,
}

impl DiagonalLine {
    /// Returns a new black, 1-unit wide line from the top-left to the
    /// bottom-right corner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new widget using `style`. Fails if `style.line_width` is not
    /// greater than 0.
    pub fn with_style(style: DiagonalLineStyle) -> crate::Result<Self> {
        validate_line_width(style.line_width)?;
        Ok(Self {
            style,
            ..Self::default()
        })
    }

    /// Returns the current style.
    #[must_use]
    pub const fn style(&self) -> &DiagonalLineStyle {
        &self.style
    }

    /// The color of the line(s).
    #[must_use]
    pub const fn line_color(&self) -> Color {
        self.style.line_color
    }

    /// Sets the color of the line(s). Any color is accepted, including
    /// transparent ones.
    pub fn set_line_color(&mut self, color: Color) {
        self.style.line_color = color;
        self.pen.invalidate();
        self.redraw.set_needs_redraw();
    }

    /// The width of the line(s).
    #[must_use]
    pub const fn line_width(&self) -> f32 {
        self.style.line_width
    }

    /// Sets the width of the line(s).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `width` is not greater than
    /// 0. The width is left unchanged and no redraw is requested.
    pub fn set_line_width(&mut self, width: f32) -> crate::Result<()> {
        self.style.line_width = validate_line_width(width)?;
        self.pen.invalidate();
        self.redraw.set_needs_redraw();
        Ok(())
    }

    /// Which diagonal(s) are drawn.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.style.direction
    }

    /// Sets which diagonal(s) are drawn.
    pub fn set_direction(&mut self, direction: Direction) {
        self.style.direction = direction;
        self.redraw.set_needs_redraw();
    }

    /// Returns true if a pen matching the current style is held.
    #[must_use]
    pub fn has_current_pen(&self) -> bool {
        self.pen.is_current()
    }
}

impl Widget for DiagonalLine {
    #[instrument(name = "DiagonalLine::render", level = "trace", skip(self, target))]
    fn render(&mut self, target: &Target, size: Size<f32, Scaled>) {
        let pen = self.pen.current(target, &self.style);
        for (from, to) in self.style.direction.segments(size) {
            target.draw_line(pen, from, to);
        }
    }

    fn redraw_status(&self) -> &RedrawStatus {
        &self.redraw
    }

    fn dispose(&mut self) {
        self.pen.invalidate();
    }

    fn text(&self) -> &str {
        ""
    }

    fn auto_size(&self) -> bool {
        false
    }

    fn background_color(&self) -> Color {
        Color::CLEAR_BLACK
    }

    fn default_size(&self) -> Size<f32, Scaled> {
        Size::new(100., 100.)
    }
}

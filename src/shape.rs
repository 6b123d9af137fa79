use lyon_tessellation::StrokeOptions;

use crate::{color::Color, math::Length};

/// Describes how lines are stroked: the color and the tessellation options,
/// including the line width in [`Scaled`](crate::math::Scaled) units.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// The color to stroke with.
    pub color: Color,
    /// The options for drawing the stroke.
    pub options: StrokeOptions,
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl Stroke {
    /// Creates a new instance using `color` with default options.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            options: StrokeOptions::default(),
        }
    }

    /// Builder-style function. Sets `options.line_width` and return self.
    #[must_use]
    pub fn line_width<F: Into<Length>>(mut self, width: F) -> Self {
        self.options.line_width = width.into().get();
        self
    }

    /// Returns the width of the stroke.
    #[must_use]
    pub fn width(&self) -> Length {
        Length::new(self.options.line_width)
    }
}

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    color::Color,
    math::{Scaled, Size},
    scene::Target,
};

mod control;
/// The diagonal line widget.
pub mod diagonal_line;

pub use self::control::Control;

/// A shared flag that widgets raise to ask their host to paint them again.
///
/// Cloning a `RedrawStatus` shares the underlying flag.
#[derive(Clone, Debug, Default)]
pub struct RedrawStatus {
    needs_redraw: Arc<AtomicBool>,
}

impl RedrawStatus {
    /// Requests that the widget be painted again.
    pub fn set_needs_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    /// Returns true if a redraw has been requested and not yet performed.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw.load(Ordering::Acquire)
    }

    /// Returns whether a redraw was requested, clearing the request.
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::AcqRel)
    }
}

/// A custom-drawn leaf widget.
///
/// The host owns the widget's bounds and calls [`Widget::render`] whenever
/// the widget's [`RedrawStatus`] has been raised or its bounds changed.
pub trait Widget {
    /// Paints the widget. `target` is already offset to the widget's origin and
    /// clipped to its bounds. `size` is the current size of its bounds.
    fn render(&mut self, target: &Target, size: Size<f32, Scaled>);

    /// Returns the flag this widget raises when it needs to be painted again.
    fn redraw_status(&self) -> &RedrawStatus;

    /// Releases any resources held for rendering. May be called more than
    /// once.
    fn dispose(&mut self) {}

    /// The text content of the widget.
    fn text(&self) -> &str;

    /// Whether the host should size the widget to fit its content.
    fn auto_size(&self) -> bool {
        true
    }

    /// The color painted behind the widget's content.
    fn background_color(&self) -> Color {
        Color::WHITE
    }

    /// The size given to the widget when it is first hosted.
    fn default_size(&self) -> Size<f32, Scaled> {
        Size::default()
    }
}

use tracing::instrument;

use crate::{
    math::{Point, Rect, Scaled, Size},
    scene::Target,
    ui::Widget,
};

/// Hosts a [`Widget`]: owns its bounds, tracks pending redraws, and forwards
/// paint and disposal to it.
#[derive(Debug)]
pub struct Control<W: Widget> {
    widget: W,
    bounds: Rect<f32, Scaled>,
}

impl<W: Widget> Control<W> {
    /// Hosts `widget` at the origin with its default size. The control starts
    /// out needing a redraw.
    pub fn new(widget: W) -> Self {
        let bounds = Rect::new(Point::origin(), widget.default_size());
        widget.redraw_status().set_needs_redraw();
        Self { widget, bounds }
    }

    /// Returns the hosted widget.
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Returns the hosted widget for mutation.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    /// Returns the current bounds, relative to the target the control is
    /// painted into.
    pub fn bounds(&self) -> Rect<f32, Scaled> {
        self.bounds
    }

    /// Returns the current size.
    pub fn size(&self) -> Size<f32, Scaled> {
        self.bounds.size
    }

    /// Resizes the control, requesting a redraw if the size changed.
    pub fn set_size(&mut self, size: Size<f32, Scaled>) {
        if self.bounds.size != size {
            self.bounds.size = size;
            self.widget.redraw_status().set_needs_redraw();
        }
    }

    /// Moves the control, requesting a redraw if the location changed.
    pub fn set_location(&mut self, location: Point<f32, Scaled>) {
        if self.bounds.origin != location {
            self.bounds.origin = location;
            self.widget.redraw_status().set_needs_redraw();
        }
    }

    /// Returns true if the widget has requested a redraw that hasn't been
    /// painted yet.
    pub fn needs_redraw(&self) -> bool {
        self.widget.redraw_status().needs_redraw()
    }

    /// Paints the widget into `target` at the control's location, clipped to
    /// the control's bounds.
    #[instrument(name = "Control::paint", level = "trace", skip(self, target))]
    pub fn paint(&mut self, target: &Target) {
        self.widget.redraw_status().take_needs_redraw();
        let offset = self.bounds.origin.to_vector() * target.scale_factor();
        let target = target.clipped_to_scaled(self.bounds).offset_by(offset);
        self.widget.render(&target, self.bounds.size);
    }

    /// Paints the widget only if a redraw is pending. Returns true if the
    /// widget was painted.
    pub fn paint_if_needed(&mut self, target: &Target) -> bool {
        if self.needs_redraw() {
            self.paint(target);
            true
        } else {
            false
        }
    }

    /// Tears the widget down, releasing its rendering resources.
    pub fn dispose(&mut self) {
        self.widget.dispose();
    }

    /// Consumes the control, returning the hosted widget.
    pub fn into_widget(self) -> W {
        self.widget
    }
}

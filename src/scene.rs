use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    math::{Point, Raw, Rect, Scale, Scaled, ScreenScale, Size, Vector},
    shape::Stroke,
};

/// Uniquely identifies a [`Pen`] within the [`Scene`] that created it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PenId(pub u64);

/// An individual render instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A straight line stroked with a pen.
    Line {
        /// The pen to stroke the line with.
        pen: PenId,
        /// The starting point.
        from: Point<f32, Raw>,
        /// The ending point.
        to: Point<f32, Raw>,
        /// The current clipping rect.
        clip: Option<Rect<u32, Raw>>,
    },
}

/// An event instructing how to render frames.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Begin a new frame with the given size.
    BeginFrame {
        /// The frame size to render.
        size: Size<f32, Raw>,
        /// The scale between [`Scaled`] and [`Raw`] for this frame.
        scale: ScreenScale,
    },
    /// A pen was allocated.
    CreatePen {
        /// The id of the new pen.
        id: PenId,
        /// The stroke the pen draws with.
        stroke: Stroke,
    },
    /// A pen was released and its id is no longer valid.
    ReleasePen(PenId),
    /// Render an element.
    Render(Element),
    /// Finish the current frame.
    EndFrame,
}

/// A native stroke resource allocated by a [`Scene`].
///
/// A pen is released exactly once, when it is dropped. Pens can't be cloned,
/// so a released id is never drawn with again by its owner.
#[derive(Debug)]
pub struct Pen {
    id: PenId,
    stroke: Stroke,
    event_sender: flume::Sender<SceneEvent>,
}

impl Pen {
    /// Returns the id of this pen.
    #[must_use]
    pub const fn id(&self) -> PenId {
        self.id
    }

    /// Returns the stroke this pen was created with.
    #[must_use]
    pub const fn stroke(&self) -> &Stroke {
        &self.stroke
    }
}

impl Drop for Pen {
    fn drop(&mut self) {
        tracing::trace!(pen = self.id.0, "releasing pen");
        drop(self.event_sender.send(SceneEvent::ReleasePen(self.id)));
    }
}

/// The main rendering destination, usually interacted with through [`Target`].
#[derive(Debug)]
pub struct Scene {
    scale_factor: ScreenScale,
    size: Size<f32, Raw>,
    event_sender: flume::Sender<SceneEvent>,
    next_pen_id: AtomicU64,
}

impl Scene {
    /// Returns a new Scene that emits [`SceneEvent`]s to `event_sender`.
    #[must_use]
    pub fn new(event_sender: flume::Sender<SceneEvent>) -> Self {
        Self {
            event_sender,
            scale_factor: Scale::new(1.),
            size: Size::default(),
            next_pen_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn push_element(&self, element: Element) {
        drop(self.event_sender.send(SceneEvent::Render(element)));
    }

    /// Allocates a new pen that strokes with `stroke`.
    pub fn create_pen(&self, stroke: Stroke) -> Pen {
        let id = PenId(self.next_pen_id.fetch_add(1, Ordering::Relaxed));
        tracing::trace!(pen = id.0, width = stroke.options.line_width, "creating pen");
        drop(self.event_sender.send(SceneEvent::CreatePen {
            id,
            stroke: stroke.clone(),
        }));
        Pen {
            id,
            stroke,
            event_sender: self.event_sender.clone(),
        }
    }

    /// Sets the size of the scene.
    pub fn set_size(&mut self, size: Size<f32, Raw>) {
        self.size = size;
    }

    /// Sets the DPI scale.
    pub fn set_scale_factor(&mut self, scale_factor: ScreenScale) {
        self.scale_factor = scale_factor;
    }

    /// Returns the current [`ScreenScale`].
    #[must_use]
    pub const fn scale_factor(&self) -> ScreenScale {
        self.scale_factor
    }

    /// Returns the current size of the scene in [`Scaled`] units.
    #[must_use]
    pub fn size(&self) -> Size<f32, Scaled> {
        self.size / self.scale_factor
    }

    /// Begins a new frame with the current size.
    pub fn start_frame(&self) {
        drop(self.event_sender.send(SceneEvent::BeginFrame {
            size: self.size,
            scale: self.scale_factor,
        }));
    }

    /// Ends the current frame, allowing it to be rendered.
    pub fn end_frame(&self) {
        drop(self.event_sender.send(SceneEvent::EndFrame));
    }
}

/// A render target
#[derive(Clone, Debug)]
pub struct Target {
    /// The scene to draw into.
    pub scene: Arc<Scene>,
    /// The curent clipping rect. All drawing calls will be clipped to this
    /// area.
    pub clip: Option<Rect<u32, Raw>>,
    /// The current offset (translation) of drawing calls.
    pub offset: Option<Vector<f32, Raw>>,
}

impl From<Arc<Scene>> for Target {
    fn from(scene: Arc<Scene>) -> Self {
        Self {
            scene,
            clip: None,
            offset: None,
        }
    }
}

impl From<Scene> for Target {
    fn from(scene: Scene) -> Self {
        Self::from(Arc::new(scene))
    }
}

impl Target {
    /// Returns a new [`Target`] with the intersection of `new_clip` an the
    /// current `clip`, if any. The scene and offset are cloned.
    #[must_use]
    pub fn clipped_to(&self, new_clip: Rect<u32, Raw>) -> Self {
        Self {
            scene: self.scene.clone(),
            clip: Some(match &self.clip {
                Some(existing_clip) => existing_clip.intersection(&new_clip).unwrap_or_default(),
                None => new_clip,
            }),
            offset: self.offset,
        }
    }

    /// Returns a new [`Target`] clipped to the device pixels covered by
    /// `rect`, after applying the scale and current `offset`. Partially covered
    /// pixels are included. Negative coordinates clamp to zero.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn clipped_to_scaled(&self, rect: Rect<f32, Scaled>) -> Self {
        let min = self.to_device(rect.min());
        let max = self.to_device(rect.max());
        // Float to int casts saturate, so negative edges become 0.
        let left = min.x.floor() as u32;
        let top = min.y.floor() as u32;
        let right = max.x.ceil() as u32;
        let bottom = max.y.ceil() as u32;
        self.clipped_to(Rect::new(
            Point::new(left, top),
            Size::new(right.saturating_sub(left), bottom.saturating_sub(top)),
        ))
    }

    /// Returns a new [`Target`] offset by `delta` from the current `offset`, if
    /// any. The scene and clipping rect are cloned.
    #[must_use]
    pub fn offset_by(&self, delta: Vector<f32, Raw>) -> Self {
        Self {
            scene: self.scene.clone(),
            clip: self.clip,
            offset: Some(match self.offset {
                Some(offset) => offset + delta,
                None => delta,
            }),
        }
    }

    /// Converts `point` to [`Raw`] and translates it by the current
    /// `offset`, if any.
    #[must_use]
    pub fn to_device(&self, point: Point<f32, Scaled>) -> Point<f32, Raw> {
        let point = point * self.scale_factor();
        match self.offset {
            Some(offset) => point + offset,
            None => point,
        }
    }

    /// Strokes a straight line from `from` to `to` using `pen`.
    pub fn draw_line(&self, pen: &Pen, from: Point<f32, Scaled>, to: Point<f32, Scaled>) {
        self.push_element(Element::Line {
            pen: pen.id(),
            from: self.to_device(from),
            to: self.to_device(to),
            clip: self.clip,
        });
    }

    /// Returns the scene as a mutable reference. Will only succeed if no other
    /// references exist.
    #[must_use]
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        Arc::get_mut(&mut self.scene)
    }
}

impl std::ops::Deref for Target {
    type Target = Scene;

    fn deref(&self) -> &Self::Target {
        self.scene.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_lifecycle_events() {
        let (sender, receiver) = flume::unbounded();
        let scene = Scene::new(sender);
        let pen = scene.create_pen(Stroke::default());
        let second = scene.create_pen(Stroke::default());
        assert_ne!(pen.id(), second.id());
        drop(pen);

        let events = receiver.try_iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                SceneEvent::CreatePen {
                    id: PenId(0),
                    stroke: Stroke::default()
                },
                SceneEvent::CreatePen {
                    id: PenId(1),
                    stroke: Stroke::default()
                },
                SceneEvent::ReleasePen(PenId(0)),
            ]
        );
    }

    #[test]
    fn draw_line_applies_scale_and_offset() {
        let (sender, receiver) = flume::unbounded();
        let mut scene = Scene::new(sender);
        scene.set_scale_factor(Scale::new(2.));
        let target = Target::from(scene).offset_by(Vector::new(10., 20.));
        let pen = target.create_pen(Stroke::default());
        target.draw_line(&pen, Point::new(0., 0.), Point::new(5., 5.));

        let element = receiver
            .try_iter()
            .find_map(|event| match event {
                SceneEvent::Render(element) => Some(element),
                _ => None,
            })
            .expect("no element rendered");
        assert_eq!(
            element,
            Element::Line {
                pen: pen.id(),
                from: Point::new(10., 20.),
                to: Point::new(20., 30.),
                clip: None,
            }
        );
    }

    #[test]
    fn clipping_intersects() {
        let (sender, receiver) = flume::unbounded();
        let target = Target::from(Scene::new(sender))
            .clipped_to(Rect::<u32, Raw>::new(Point::new(0, 0), Size::new(10, 10)))
            .clipped_to(Rect::new(Point::new(5, 5), Size::new(10, 10)));
        assert_eq!(
            target.clip,
            Some(Rect::new(Point::new(5, 5), Size::new(5, 5)))
        );

        let pen = target.create_pen(Stroke::default());
        target.draw_line(&pen, Point::new(0., 0.), Point::new(1., 1.));
        assert!(receiver.try_iter().any(|event| matches!(
            event,
            SceneEvent::Render(Element::Line { clip: Some(clip), .. }) if clip == target.clip.unwrap()
        )));
    }

    #[test]
    fn scaled_clip_covers_partial_pixels() {
        let (sender, _receiver) = flume::unbounded();
        let mut scene = Scene::new(sender);
        scene.set_scale_factor(Scale::new(1.5));
        let target = Target::from(scene).offset_by(Vector::new(-4., 2.));
        let clipped =
            target.clipped_to_scaled(Rect::new(Point::new(1., 1.), Size::new(5., 3.)));
        // (1.5 - 4, 1.5 + 2) to (9 - 4, 6 + 2)
        assert_eq!(
            clipped.clip,
            Some(Rect::new(Point::new(0, 3), Size::new(5, 5)))
        );
        assert_eq!(clipped.offset, target.offset);
    }

    #[test]
    fn sending_without_receiver_is_ignored() {
        let (sender, receiver) = flume::unbounded();
        drop(receiver);
        let scene = Scene::new(sender);
        let pen = scene.create_pen(Stroke::default());
        Target::from(scene).draw_line(&pen, Point::new(0., 0.), Point::new(1., 1.));
    }
}

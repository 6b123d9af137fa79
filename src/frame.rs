use std::collections::HashMap;

use lyon_tessellation::{
    math::point, path::Path, BuffersBuilder, StrokeTessellator, StrokeVertex,
    StrokeVertexConstructor, VertexBuffers,
};
use tracing::instrument;

use crate::{
    error::Error,
    math::{Point, Raw, Rect, Scale, ScreenScale, Size, Vector},
    scene::{Element, PenId, SceneEvent},
    shape::Stroke,
};

/// A resolved draw instruction for a completed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    /// Stroke a straight line.
    StrokeLine {
        /// The starting point.
        from: Point<f32, Raw>,
        /// The ending point.
        to: Point<f32, Raw>,
        /// The stroke of the pen the line was drawn with.
        stroke: Stroke,
        /// The clipping rect active when the line was drawn.
        clip: Option<Rect<u32, Raw>>,
    },
}

/// A tessellated vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// The position in [`Raw`] units.
    pub position: [f32; 2],
    /// The RGBA color of the vertex.
    pub color: [f32; 4],
}

/// Tessellated strokes that share one clipping rect.
///
/// Lines are clipped to `clip` before they are stroked, but the stroke itself
/// can still extend up to half its width past the clip's edges. Hosts scissor
/// to `clip` when drawing the batch.
#[derive(Debug)]
pub struct StrokeBatch {
    /// The clipping rect of every stroke in this batch.
    pub clip: Option<Rect<u32, Raw>>,
    /// The triangles of the batch.
    pub geometry: VertexBuffers<Vertex, u16>,
}

/// The latest complete frame received from a [`Scene`](crate::scene::Scene).
#[derive(Debug)]
pub struct Frame {
    /// The size of the frame.
    pub size: Size<f32, Raw>,
    /// The scale the frame was drawn at.
    pub scale: ScreenScale,
    commands: Vec<FrameCommand>,
    receiver: FrameReceiver,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            size: Size::default(),
            scale: Scale::new(1.),
            commands: Vec::new(),
            receiver: FrameReceiver::default(),
        }
    }
}

#[derive(Debug)]
struct FrameReceiver {
    size: Size<f32, Raw>,
    scale: ScreenScale,
    pens: HashMap<PenId, Stroke>,
    commands: Vec<FrameCommand>,
    error: Option<Error>,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self {
            size: Size::default(),
            scale: Scale::new(1.),
            pens: HashMap::new(),
            commands: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug)]
struct ReceivedFrame {
    size: Size<f32, Raw>,
    scale: ScreenScale,
    commands: Vec<FrameCommand>,
}

impl FrameReceiver {
    fn get_latest_frame(
        &mut self,
        receiver: &flume::Receiver<SceneEvent>,
    ) -> Option<crate::Result<ReceivedFrame>> {
        // Block until a frame is complete
        loop {
            let evt = receiver.recv().ok()?;
            if self.process_scene_event(evt) {
                break;
            }
        }
        let mut latest_frame = self.take_frame();
        // Only the most recent complete frame is kept
        while let Ok(evt) = receiver.try_recv() {
            if self.process_scene_event(evt) {
                latest_frame = self.take_frame();
            }
        }
        Some(latest_frame)
    }

    // Size and scale are captured here, since a newer frame may begin before
    // this one is handed out.
    fn take_frame(&mut self) -> crate::Result<ReceivedFrame> {
        let commands = std::mem::take(&mut self.commands);
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(ReceivedFrame {
                size: self.size,
                scale: self.scale,
                commands,
            }),
        }
    }

    fn process_scene_event(&mut self, event: SceneEvent) -> bool {
        match event {
            SceneEvent::BeginFrame { size, scale } => {
                self.size = size;
                self.scale = scale;
                self.commands.clear();
                self.error = None;
                false
            }
            SceneEvent::CreatePen { id, stroke } => {
                self.pens.insert(id, stroke);
                false
            }
            SceneEvent::ReleasePen(id) => {
                if self.pens.remove(&id).is_none() {
                    self.record_error(Error::UnknownPen(id));
                }
                false
            }
            SceneEvent::Render(Element::Line { pen, from, to, clip }) => {
                match self.pens.get(&pen) {
                    Some(stroke) => self.commands.push(FrameCommand::StrokeLine {
                        from,
                        to,
                        stroke: stroke.clone(),
                        clip,
                    }),
                    None => self.record_error(Error::UnknownPen(pen)),
                }
                false
            }
            SceneEvent::EndFrame => true,
        }
    }

    fn record_error(&mut self, error: Error) {
        tracing::warn!("{}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// Clips the segment `from`-`to` to `clip` using the Liang-Barsky algorithm.
/// Returns `None` if no part of the segment is inside `clip`.
fn clip_segment(
    from: Point<f32, Raw>,
    to: Point<f32, Raw>,
    clip: Rect<u32, Raw>,
) -> Option<(Point<f32, Raw>, Point<f32, Raw>)> {
    let clip = clip.cast::<f32>();
    let delta: Vector<f32, Raw> = to - from;
    let mut enter = 0_f32;
    let mut exit = 1_f32;
    for (direction, distance) in [
        (-delta.x, from.x - clip.min_x()),
        (delta.x, clip.max_x() - from.x),
        (-delta.y, from.y - clip.min_y()),
        (delta.y, clip.max_y() - from.y),
    ] {
        if direction.abs() < f32::EPSILON {
            // Parallel to this edge
            if distance < 0. {
                return None;
            }
        } else {
            let ratio = distance / direction;
            if direction < 0. {
                if ratio > exit {
                    return None;
                }
                enter = enter.max(ratio);
            } else {
                if ratio < enter {
                    return None;
                }
                exit = exit.min(ratio);
            }
        }
    }
    Some((from + delta * enter, from + delta * exit))
}

struct WithColor([f32; 4]);

impl StrokeVertexConstructor<Vertex> for WithColor {
    fn new_vertex(&mut self, vertex: StrokeVertex<'_, '_>) -> Vertex {
        Vertex {
            position: vertex.position().to_array(),
            color: self.0,
        }
    }
}

impl Frame {
    /// Waits for the next complete frame from `event_receiver`. If several
    /// frames are pending, only the most recent one is kept.
    ///
    /// Returns `Ok(false)` if the scene has been dropped and no frame was
    /// available. Returns [`Error::UnknownPen`] if the frame drew with or
    /// released a pen that isn't alive.
    #[instrument(name = "Frame::update", level = "trace", skip(self, event_receiver))]
    pub fn update(&mut self, event_receiver: &flume::Receiver<SceneEvent>) -> crate::Result<bool> {
        let frame = match self.receiver.get_latest_frame(event_receiver) {
            Some(frame) => frame?,
            None => return Ok(false),
        };
        self.size = frame.size;
        self.scale = frame.scale;
        self.commands = frame.commands;
        Ok(true)
    }

    /// Returns the draw commands of the current frame.
    #[must_use]
    pub fn commands(&self) -> &[FrameCommand] {
        &self.commands
    }

    /// Returns the number of pens that have been created and not yet
    /// released.
    #[must_use]
    pub fn live_pens(&self) -> usize {
        self.receiver.pens.len()
    }

    /// Tessellates every stroked line of the current frame into triangles,
    /// batched by clipping rect in drawing order. Lines entirely outside of
    /// their clipping rect produce no geometry.
    pub fn tessellate(&self) -> crate::Result<Vec<StrokeBatch>> {
        let mut batches: Vec<StrokeBatch> = Vec::new();
        let mut tessellator = StrokeTessellator::new();
        for command in &self.commands {
            match command {
                FrameCommand::StrokeLine {
                    from,
                    to,
                    stroke,
                    clip,
                } => {
                    let (from, to) = match clip {
                        Some(clip) => match clip_segment(*from, *to, *clip) {
                            Some(segment) => segment,
                            None => continue,
                        },
                        None => (*from, *to),
                    };

                    if batches.last().map_or(true, |batch| batch.clip != *clip) {
                        batches.push(StrokeBatch {
                            clip: *clip,
                            geometry: VertexBuffers::new(),
                        });
                    }
                    let batch = match batches.last_mut() {
                        Some(batch) => batch,
                        None => continue,
                    };

                    let mut builder = Path::builder();
                    builder.begin(point(from.x, from.y));
                    builder.line_to(point(to.x, to.y));
                    builder.end(false);
                    let path = builder.build();

                    let options = stroke
                        .options
                        .with_line_width(stroke.options.line_width * self.scale.get());
                    tessellator
                        .tessellate_path(
                            &path,
                            &options,
                            &mut BuffersBuilder::new(
                                &mut batch.geometry,
                                WithColor(stroke.color.rgba()),
                            ),
                        )
                        .map_err(Error::Tessellation)?;
                }
            }
        }
        Ok(batches)
    }
}

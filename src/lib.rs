//! A transparent leaf widget that strokes one or both diagonals of its
//! bounds, along with the small scene and frame types it draws through.

#![forbid(unsafe_code)]
#![warn(
    clippy::cargo,
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
)]

mod color;
mod error;
/// Consumes scene events into renderable frames.
pub mod frame;
/// Math types for 2d geometry.
pub mod math;
/// `Scene` and `Target` types that are used to draw.
pub mod scene;
/// Types describing how shapes are stroked.
pub mod shape;
#[cfg(test)]
mod tests;
/// The widget trait, its host, and the diagonal line widget.
pub mod ui;

// Re-exports
pub use euclid;
pub use flume;
pub use lyon_tessellation;

pub use self::{color::Color, error::Error};

/// A collection of commonly used exports provided by this crate.
pub mod prelude {
    pub use super::{
        frame::{Frame, FrameCommand, StrokeBatch, Vertex},
        math::{Length, Point, Raw, Rect, Scale, Scaled, ScreenScale, Size, Vector},
        scene::{Element, Pen, PenId, Scene, SceneEvent, Target},
        shape::Stroke,
        ui::{
            diagonal_line::{DiagonalLine, DiagonalLineStyle, Direction},
            Control, RedrawStatus, Widget,
        },
        Color, Error,
    };
}

/// Alias for [`std::result::Result`] where the error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

use lyon_tessellation::TessellationError;

use crate::scene::PenId;

/// All errors that `diagonal-line` can return.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A property was assigned a value outside of its valid range. The
    /// property keeps its previous value.
    #[error("invalid value for {property}: {value} (must be greater than 0)")]
    InvalidConfiguration {
        /// The name of the property being assigned.
        property: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A draw instruction referenced a pen that was never created or has
    /// already been released.
    #[error("draw instruction references unknown pen {0:?}")]
    UnknownPen(PenId),
    /// An error while tessellating strokes.
    #[error("error tessellating stroke: {0:?}")]
    Tessellation(TessellationError),
}

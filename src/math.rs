/// A type representing a width and height.
pub type Size<T = f32, Unit = Scaled> = euclid::Size2D<T, Unit>;
/// A type representing an x and y coordinate.
pub type Point<T = f32, Unit = Scaled> = euclid::Point2D<T, Unit>;
/// A type representing a [`Point`] and [`Size`].
pub type Rect<T = f32, Unit = Scaled> = euclid::Rect<T, Unit>;
/// A type representing a vector with magnitudes x and y.
pub type Vector<T = f32, Unit = Scaled> = euclid::Vector2D<T, Unit>;
/// A one-dimensional measurement.
pub type Length<T = f32, Unit = Scaled> = euclid::Length<T, Unit>;
pub use euclid::Scale;
/// The scale used to convert between [`Scaled`] and [`Raw`] units.
pub type ScreenScale = Scale<f32, Scaled, Raw>;

/// A unit representing physical pixels on a display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Raw;

/// A unit representing DPI-independent widget coordinates. Widgets lay out
/// and draw in this unit; the [`ScreenScale`] of a scene converts it to
/// [`Raw`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scaled;

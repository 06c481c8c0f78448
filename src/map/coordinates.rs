mod boxes;
mod coords;
mod view;

/// Bounding boxes.
pub use boxes::*;
/// Coordinates.
pub use coords::*;
/// The visible part of the map.
pub use view::*;

/// A trait generalizing types of coordinates used in this application.
pub trait Coordinate: Copy + Clone + std::fmt::Debug {
  fn as_pixel_coordinate(&self) -> PixelCoordinate;
}

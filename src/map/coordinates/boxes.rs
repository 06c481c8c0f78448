use super::{Coordinate, PixelCoordinate};

/// An axis aligned box on the canvas. Starts out invalid and grows with every
/// added coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  max_x: f32,
  min_x: f32,
  max_y: f32,
  min_y: f32,
}

impl Default for BoundingBox {
  fn default() -> Self {
    Self::new()
  }
}

impl BoundingBox {
  #[must_use]
  pub fn new() -> Self {
    Self::get_invalid()
  }

  #[must_use]
  pub fn get_invalid() -> Self {
    Self {
      max_x: f32::MIN,
      min_x: f32::MAX,
      max_y: f32::MIN,
      min_y: f32::MAX,
    }
  }

  pub fn from_iterator<C: Coordinate, I: IntoIterator<Item = C>>(positions: I) -> Self {
    let mut bb = Self::get_invalid();
    positions
      .into_iter()
      .for_each(|pos| bb.add_coordinate(pos.as_pixel_coordinate()));
    bb
  }

  #[must_use]
  pub fn center(&self) -> PixelCoordinate {
    PixelCoordinate {
      x: f32::midpoint(self.max_x, self.min_x),
      y: f32::midpoint(self.max_y, self.min_y),
    }
  }

  /// The north west corner.
  #[must_use]
  pub fn min(&self) -> PixelCoordinate {
    PixelCoordinate::new(self.min_x, self.min_y)
  }

  /// The south east corner.
  #[must_use]
  pub fn max(&self) -> PixelCoordinate {
    PixelCoordinate::new(self.max_x, self.max_y)
  }

  /// At least one coordinate was added.
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.min_y <= self.max_y && self.min_x <= self.max_x
  }

  /// Valid, but without any extent, e.g. a single point.
  #[must_use]
  pub fn is_degenerate(&self) -> bool {
    self.is_valid() && self.width() <= f32::EPSILON && self.height() <= f32::EPSILON
  }

  pub fn add_coordinate(&mut self, pp: PixelCoordinate) {
    self.min_y = self.min_y.min(pp.y);
    self.min_x = self.min_x.min(pp.x);
    self.max_y = self.max_y.max(pp.y);
    self.max_x = self.max_x.max(pp.x);
  }

  #[must_use]
  pub fn width(&self) -> f32 {
    self.max_x - self.min_x
  }

  #[must_use]
  pub fn height(&self) -> f32 {
    self.max_y - self.min_y
  }
}

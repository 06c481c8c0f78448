use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// The fixed canvas size for ``PixelCoordinate``s. Equals the world width in
/// pixels at zoom level 3 with 256 pixel tiles.
pub const CANVAS_SIZE: f32 = 2048.;

const PI: f32 = std::f32::consts::PI;

/// The standard WGS84 coordinate system.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct WGS84Coordinate {
  #[serde(alias = "latitude")]
  pub lat: f32,
  #[serde(alias = "longitude")]
  pub lon: f32,
}

impl WGS84Coordinate {
  #[must_use]
  pub fn new(lat: f32, lon: f32) -> Self {
    Self { lat, lon }
  }

  /// Finite and inside the Web Mercator range.
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.lat.is_finite()
      && self.lon.is_finite()
      && (-85.06..=85.06).contains(&self.lat)
      && (-180.0..=180.0).contains(&self.lon)
  }
}

impl Coordinate for WGS84Coordinate {
  fn as_pixel_coordinate(&self) -> PixelCoordinate {
    PixelCoordinate::from(*self)
  }
}

/// A coordinate on an imaginary canvas of ``CANVAS_SIZE`` pixels.
/// Is equivalent to Web Mercator projection on a fixed zoom level.
#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct PixelCoordinate {
  pub x: f32,
  pub y: f32,
}

impl PixelCoordinate {
  #[must_use]
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  #[must_use]
  pub fn sq_dist(&self, p: &Self) -> f32 {
    let dx = p.x - self.x;
    let dy = p.y - self.y;
    dx * dx + dy * dy
  }
}

impl Coordinate for PixelCoordinate {
  fn as_pixel_coordinate(&self) -> PixelCoordinate {
    *self
  }
}

impl From<WGS84Coordinate> for PixelCoordinate {
  fn from(coord: WGS84Coordinate) -> Self {
    let lat = coord.lat.to_radians();
    Self {
      x: (coord.lon + 180.) / 360. * CANVAS_SIZE,
      y: (1. - (lat.tan() + 1. / lat.cos()).ln() / PI) / 2. * CANVAS_SIZE,
    }
  }
}

impl Add for PixelCoordinate {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self {
      x: self.x + rhs.x,
      y: self.y + rhs.y,
    }
  }
}

impl Sub for PixelCoordinate {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    Self {
      x: self.x - rhs.x,
      y: self.y - rhs.y,
    }
  }
}

impl Mul<f32> for PixelCoordinate {
  type Output = Self;

  fn mul(self, rhs: f32) -> Self {
    Self {
      x: self.x * rhs,
      y: self.y * rhs,
    }
  }
}

/// Meant for actual pixels in the UI, relative to the top left corner of the
/// map. Handled equivalently to a ``egui::Pos2``.
#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct PixelPosition {
  pub x: f32,
  pub y: f32,
}

impl PixelPosition {
  #[must_use]
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  #[must_use]
  pub fn distance(&self, other: &Self) -> f32 {
    (self.x - other.x).hypot(self.y - other.y)
  }
}

impl From<egui::Pos2> for PixelPosition {
  fn from(pos: egui::Pos2) -> Self {
    PixelPosition { x: pos.x, y: pos.y }
  }
}

impl From<PixelPosition> for egui::Pos2 {
  fn from(pp: PixelPosition) -> Self {
    egui::Pos2::new(pp.x, pp.y)
  }
}

impl From<egui::Vec2> for PixelPosition {
  fn from(v: egui::Vec2) -> Self {
    PixelPosition { x: v.x, y: v.y }
  }
}

impl Add for PixelPosition {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self {
      x: self.x + rhs.x,
      y: self.y + rhs.y,
    }
  }
}

impl Sub for PixelPosition {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    Self {
      x: self.x - rhs.x,
      y: self.y - rhs.y,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use assert_approx_eq::assert_approx_eq;

  #[test]
  fn null_island_is_canvas_center() {
    let pc = PixelCoordinate::from(WGS84Coordinate::new(0., 0.));
    assert_approx_eq!(pc.x, 1024.);
    assert_approx_eq!(pc.y, 1024.);
  }

  #[test]
  fn north_is_up_and_west_is_left() {
    let slc = PixelCoordinate::from(WGS84Coordinate::new(40.7608, -111.891));
    let ogden = PixelCoordinate::from(WGS84Coordinate::new(41.223, -111.9738));
    assert!(ogden.y < slc.y);
    assert!(ogden.x < slc.x);
    assert_approx_eq!(PixelCoordinate::from(WGS84Coordinate::new(0., -180.)).x, 0.);
  }

  #[test]
  fn validity() {
    assert!(WGS84Coordinate::new(40.75, -111.9).is_valid());
    assert!(!WGS84Coordinate::new(f32::NAN, -111.9).is_valid());
    assert!(!WGS84Coordinate::new(40.75, f32::INFINITY).is_valid());
    assert!(!WGS84Coordinate::new(89.9, 0.).is_valid());
    assert!(!WGS84Coordinate::new(0., 181.).is_valid());
  }
}

use super::{BoundingBox, PixelCoordinate, PixelPosition, WGS84Coordinate};

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 19;

/// Zoom level at which one ``PixelCoordinate`` unit is one screen pixel.
const CANVAS_ZOOM: i32 = 3;

/// What part of the canvas is shown: a center, a web map style integer zoom
/// level and the size of the widget in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
  center: PixelCoordinate,
  zoom: u8,
  size: PixelPosition,
}

impl MapView {
  #[must_use]
  pub fn new(center: WGS84Coordinate, zoom: u8) -> Self {
    Self {
      center: center.into(),
      zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
      size: PixelPosition::new(800., 600.),
    }
  }

  #[must_use]
  pub fn center(&self) -> PixelCoordinate {
    self.center
  }

  #[must_use]
  pub fn zoom(&self) -> u8 {
    self.zoom
  }

  #[must_use]
  pub fn size(&self) -> PixelPosition {
    self.size
  }

  pub fn set_size(&mut self, size: PixelPosition) {
    self.size = size;
  }

  /// Screen pixels per canvas unit.
  #[must_use]
  pub fn scale(&self) -> f32 {
    2f32.powi(i32::from(self.zoom) - CANVAS_ZOOM)
  }

  #[must_use]
  pub fn to_screen(&self, coord: PixelCoordinate) -> PixelPosition {
    let d = (coord - self.center) * self.scale();
    PixelPosition::new(d.x + self.size.x / 2., d.y + self.size.y / 2.)
  }

  #[must_use]
  pub fn to_canvas(&self, pos: PixelPosition) -> PixelCoordinate {
    let d = PixelCoordinate::new(pos.x - self.size.x / 2., pos.y - self.size.y / 2.);
    self.center + d * (1. / self.scale())
  }

  pub fn set_view(&mut self, center: PixelCoordinate, zoom: u8) {
    self.center = center;
    self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
  }

  /// Moves the map content by a screen delta, e.g. from dragging.
  pub fn pan(&mut self, delta: PixelPosition) {
    self.center = self.center - PixelCoordinate::new(delta.x, delta.y) * (1. / self.scale());
  }

  /// Changes the zoom by `steps` while keeping the canvas point under `anchor`
  /// in place. Returns whether the zoom changed.
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  pub fn zoom_around(&mut self, steps: i32, anchor: PixelPosition) -> bool {
    let new_zoom = (i32::from(self.zoom) + steps).clamp(i32::from(MIN_ZOOM), i32::from(MAX_ZOOM));
    if new_zoom == i32::from(self.zoom) {
      return false;
    }
    let fixed = self.to_canvas(anchor);
    self.zoom = new_zoom as u8;
    let offset = PixelCoordinate::new(anchor.x - self.size.x / 2., anchor.y - self.size.y / 2.);
    self.center = fixed - offset * (1. / self.scale());
    true
  }

  /// The largest zoom level at which `bb` plus `padding` screen pixels on every
  /// side fits into the view. A box without extent fits at ``MAX_ZOOM``.
  #[must_use]
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  pub fn bounds_zoom(&self, bb: &BoundingBox, padding: f32) -> u8 {
    if bb.is_degenerate() {
      return MAX_ZOOM;
    }
    let available_x = (self.size.x - 2. * padding).max(1.);
    let available_y = (self.size.y - 2. * padding).max(1.);
    let ratio = (available_x / bb.width()).min(available_y / bb.height());
    let zoom = (ratio.log2() + CANVAS_ZOOM as f32).floor();
    zoom.clamp(f32::from(MIN_ZOOM), f32::from(MAX_ZOOM)) as u8
  }

  /// Centers on `bb` at the zoom from ``Self::bounds_zoom``. Returns false for
  /// an invalid box.
  pub fn fit(&mut self, bb: &BoundingBox, padding: f32) -> bool {
    if !bb.is_valid() {
      return false;
    }
    let zoom = self.bounds_zoom(bb, padding);
    self.set_view(bb.center(), zoom);
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use assert_approx_eq::assert_approx_eq;

  #[test]
  fn screen_canvas_round_trip() {
    let view = MapView::new(WGS84Coordinate::new(40.7608, -111.891), 13);
    let pos = PixelPosition::new(123., 456.);
    let back = view.to_screen(view.to_canvas(pos));
    assert_approx_eq!(back.x, pos.x, 0.01);
    assert_approx_eq!(back.y, pos.y, 0.01);
    let center = view.to_screen(view.center());
    assert_approx_eq!(center.x, 400.);
    assert_approx_eq!(center.y, 300.);
  }

  #[test]
  fn fitting_a_single_point_uses_max_zoom() {
    let mut view = MapView::new(WGS84Coordinate::new(0., 0.), 5);
    let bb = BoundingBox::from_iterator([WGS84Coordinate::new(40.75, -111.9)]);
    assert!(view.fit(&bb, 50.));
    assert_eq!(view.zoom(), MAX_ZOOM);
    assert_eq!(view.center(), bb.center());
  }

  #[test]
  fn fitted_bounds_are_on_screen() {
    let mut view = MapView::new(WGS84Coordinate::new(0., 0.), 5);
    let points = [
      WGS84Coordinate::new(40.7608, -111.891),
      WGS84Coordinate::new(40.75, -111.9),
      WGS84Coordinate::new(40.70, -111.95),
    ];
    let bb = BoundingBox::from_iterator(points);
    assert!(view.fit(&bb, 50.));
    for p in points {
      let screen = view.to_screen(p.into());
      assert!((50. ..=750.).contains(&screen.x), "{screen:?}");
      assert!((50. ..=550.).contains(&screen.y), "{screen:?}");
    }
    // One more zoom level would not fit anymore.
    let mut closer = view;
    closer.set_view(view.center(), view.zoom() + 1);
    let outside = points.iter().any(|p| {
      let s = closer.to_screen((*p).into());
      !(50. ..=750.).contains(&s.x) || !(50. ..=550.).contains(&s.y)
    });
    assert!(outside);
  }

  #[test]
  fn invalid_box_is_not_fitted() {
    let mut view = MapView::new(WGS84Coordinate::new(0., 0.), 5);
    let before = view;
    assert!(!view.fit(&BoundingBox::new(), 50.));
    assert_eq!(view, before);
  }

  #[test]
  fn zoom_keeps_anchor_in_place() {
    let mut view = MapView::new(WGS84Coordinate::new(40.7608, -111.891), 12);
    let anchor = PixelPosition::new(100., 100.);
    let fixed = view.to_canvas(anchor);
    assert!(view.zoom_around(2, anchor));
    assert_eq!(view.zoom(), 14);
    let moved = view.to_screen(fixed);
    assert_approx_eq!(moved.x, anchor.x, 0.01);
    assert_approx_eq!(moved.y, anchor.y, 0.01);

    assert!(view.zoom_around(10, anchor));
    assert_eq!(view.zoom(), MAX_ZOOM);
    assert!(!view.zoom_around(1, anchor));
  }
}

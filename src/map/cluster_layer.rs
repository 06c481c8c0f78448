use std::f32::consts::TAU;

use log::debug;

use crate::{
  config::{ClusterSettings, MapSettings},
  map::coordinates::{BoundingBox, MAX_ZOOM, MapView, PixelCoordinate, PixelPosition, WGS84Coordinate},
  project::{Category, ProjectId},
  render::{Marker, MarkerSurface},
};

/// Screen distance between fanned out markers.
const SPIDER_FOOT_SEPARATION: f32 = 25.;
/// Click tolerance around a pin.
const PIN_HIT_RADIUS: f32 = 14.;
/// Click tolerance around a cluster bubble.
const CLUSTER_HIT_RADIUS: f32 = 22.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
  Small,
  Medium,
  Large,
}

impl SizeClass {
  #[must_use]
  pub fn from_count(count: usize) -> Self {
    if count > 50 {
      SizeClass::Large
    } else if count > 10 {
      SizeClass::Medium
    } else {
      SizeClass::Small
    }
  }
}

/// Markers grouped at the current zoom. Holds indices into the marker list.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
  pub members: Vec<usize>,
  pub anchor: PixelCoordinate,
}

impl Cluster {
  #[must_use]
  pub fn child_count(&self) -> usize {
    self.members.len()
  }

  #[must_use]
  pub fn size_class(&self) -> SizeClass {
    SizeClass::from_count(self.child_count())
  }

  /// The most frequent category. Ties go to the category seen last.
  #[must_use]
  pub fn dominant_category(&self, markers: &[Marker]) -> Category {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for category in self.members.iter().map(|i| markers[*i].category) {
      if let Some(entry) = counts.iter_mut().find(|(c, _)| *c == category) {
        entry.1 += 1;
      } else {
        counts.push((category, 1));
      }
    }
    counts
      .into_iter()
      .max_by_key(|(_, count)| *count)
      .map_or(Category::Default, |(category, _)| category)
  }
}

/// Something to draw, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum MapItem {
  Pin {
    index: usize,
    position: PixelPosition,
  },
  Group {
    members: Vec<usize>,
    position: PixelPosition,
    size: SizeClass,
    dominant: Category,
  },
  /// A disclosed cluster member with the leg to its cluster anchor.
  SpiderLeg {
    index: usize,
    anchor: PixelPosition,
    position: PixelPosition,
  },
}

/// What a click on the map hit.
#[derive(Debug, Clone, PartialEq)]
pub enum MapHit {
  Marker(ProjectId),
  Cluster(Vec<usize>),
}

/// Holds the markers, groups them by screen proximity and keeps the view,
/// the disclosed cluster and the open popup.
#[derive(Debug, Clone)]
pub struct ClusterLayer {
  settings: ClusterSettings,
  markers: Vec<Marker>,
  view: MapView,
  spiderfied: Option<Vec<usize>>,
  open_popup: Option<ProjectId>,
  /// The last fitted bounds and padding, until the view is moved by hand.
  fitted: Option<(BoundingBox, f32)>,
}

impl ClusterLayer {
  #[must_use]
  pub fn new(settings: &MapSettings) -> Self {
    Self {
      settings: settings.cluster.clone(),
      markers: Vec::new(),
      view: MapView::new(settings.center, settings.initial_zoom),
      spiderfied: None,
      open_popup: None,
      fitted: None,
    }
  }

  #[must_use]
  pub fn markers(&self) -> &[Marker] {
    &self.markers
  }

  #[must_use]
  pub fn view(&self) -> &MapView {
    &self.view
  }

  /// Fitted bounds are fitted again to the new size as long as the view was
  /// not moved since.
  pub fn set_viewport_size(&mut self, size: PixelPosition) {
    if self.view.size() == size {
      return;
    }
    self.view.set_size(size);
    if let Some((bounds, padding)) = self.fitted {
      let zoom = self.view.zoom();
      self.view.fit(&bounds, padding);
      if self.view.zoom() != zoom {
        self.unspiderfy();
      }
    }
  }

  pub fn pan(&mut self, delta: PixelPosition) {
    self.view.pan(delta);
    self.fitted = None;
  }

  pub fn zoom_around(&mut self, steps: i32, anchor: PixelPosition) {
    if self.view.zoom_around(steps, anchor) {
      self.fitted = None;
      self.unspiderfy();
    }
  }

  #[must_use]
  pub fn popup(&self) -> Option<&Marker> {
    let id = self.open_popup.as_ref()?;
    self.markers.iter().find(|m| &m.id == id)
  }

  pub fn close_popup(&mut self) {
    self.open_popup = None;
  }

  fn unspiderfy(&mut self) {
    self.spiderfied = None;
  }

  fn index_of(&self, id: &ProjectId) -> Option<usize> {
    self.markers.iter().position(|m| &m.id == id)
  }

  fn clustering_enabled(&self) -> bool {
    self.view.zoom() < self.settings.disable_clustering_at_zoom
  }

  /// Greedy grouping in marker order: a marker joins the first cluster whose
  /// anchor is within ``ClusterSettings::max_cluster_radius`` screen pixels.
  #[must_use]
  pub fn clusters(&self) -> Vec<Cluster> {
    let scale = self.view.scale();
    let radius = self.settings.max_cluster_radius;
    let mut clusters: Vec<Cluster> = Vec::new();
    for (index, marker) in self.markers.iter().enumerate() {
      let coord = PixelCoordinate::from(marker.position);
      let near = if self.clustering_enabled() {
        clusters
          .iter_mut()
          .find(|c| c.anchor.sq_dist(&coord).sqrt() * scale <= radius)
      } else {
        None
      };
      if let Some(cluster) = near {
        cluster.members.push(index);
      } else {
        clusters.push(Cluster {
          members: vec![index],
          anchor: coord,
        });
      }
    }
    clusters
  }

  fn cluster_of(&self, index: usize) -> Option<Cluster> {
    self
      .clusters()
      .into_iter()
      .find(|c| c.child_count() > 1 && c.members.contains(&index))
  }

  fn member_bounds(&self, members: &[usize]) -> BoundingBox {
    BoundingBox::from_iterator(members.iter().map(|i| self.markers[*i].position))
  }

  /// Screen corners of the area spanned by the members of a cluster. None if
  /// they share one position.
  #[must_use]
  pub fn coverage(&self, members: &[usize]) -> Option<(PixelPosition, PixelPosition)> {
    let bounds = self.member_bounds(members);
    if !bounds.is_valid() || bounds.is_degenerate() {
      return None;
    }
    Some((self.view.to_screen(bounds.min()), self.view.to_screen(bounds.max())))
  }

  fn spider_offsets(count: usize) -> Vec<PixelPosition> {
    #[allow(clippy::cast_precision_loss)]
    let count_f = count as f32;
    let leg = SPIDER_FOOT_SEPARATION * (2. + count_f) / TAU;
    (0..count)
      .map(|i| {
        #[allow(clippy::cast_precision_loss)]
        let angle = TAU * i as f32 / count_f;
        PixelPosition::new(leg * angle.cos(), leg * angle.sin())
      })
      .collect()
  }

  /// Everything to draw for the current view, bottom to top.
  #[must_use]
  pub fn items(&self) -> Vec<MapItem> {
    let mut items = Vec::new();
    for cluster in self.clusters() {
      let position = self.view.to_screen(cluster.anchor);
      let disclosed = self.spiderfied.as_ref() == Some(&cluster.members);
      if cluster.child_count() == 1 {
        items.push(MapItem::Pin {
          index: cluster.members[0],
          position: self.view.to_screen(self.markers[cluster.members[0]].position.into()),
        });
      } else if disclosed {
        let offsets = Self::spider_offsets(cluster.child_count());
        for (index, offset) in cluster.members.iter().zip(offsets) {
          items.push(MapItem::SpiderLeg {
            index: *index,
            anchor: position,
            position: position + offset,
          });
        }
      } else {
        items.push(MapItem::Group {
          size: cluster.size_class(),
          dominant: cluster.dominant_category(&self.markers),
          members: cluster.members,
          position,
        });
      }
    }
    items
  }

  /// The topmost item under `pos`.
  #[must_use]
  pub fn hit(&self, pos: PixelPosition) -> Option<MapHit> {
    self.items().into_iter().rev().find_map(|item| match item {
      MapItem::Pin { index, position } | MapItem::SpiderLeg { index, position, .. }
        if position.distance(&pos) <= PIN_HIT_RADIUS =>
      {
        Some(MapHit::Marker(self.markers[index].id.clone()))
      }
      MapItem::Group {
        members, position, ..
      } if position.distance(&pos) <= CLUSTER_HIT_RADIUS => Some(MapHit::Cluster(members)),
      _ => None,
    })
  }

  /// Zooms to the cluster, or fans it out if zooming would not separate it.
  pub fn click_cluster(&mut self, members: &[usize]) {
    debug!("Cluster clicked with {} markers", members.len());
    let bounds = self.member_bounds(members);
    let target_zoom = self.view.bounds_zoom(&bounds, 0.);
    let cannot_zoom_further = target_zoom <= self.view.zoom() || self.view.zoom() >= MAX_ZOOM;
    if cannot_zoom_further && self.settings.spiderfy_on_max_zoom {
      self.disclose(members.to_vec());
    } else {
      self.view.set_view(bounds.center(), target_zoom);
      self.fitted = None;
      self.unspiderfy();
    }
  }

  fn disclose(&mut self, members: Vec<usize>) {
    debug!("Cluster spiderfied with {} markers", members.len());
    self.spiderfied = Some(members);
  }
}

impl MarkerSurface for ClusterLayer {
  fn clear_markers(&mut self) {
    self.markers.clear();
    self.spiderfied = None;
    self.open_popup = None;
    self.fitted = None;
  }

  fn add_marker(&mut self, marker: Marker) {
    self.markers.push(marker);
  }

  fn marker_bounds(&self) -> BoundingBox {
    BoundingBox::from_iterator(self.markers.iter().map(|m| m.position))
  }

  fn fit_bounds(&mut self, bounds: &BoundingBox, padding: f32) {
    if self.view.fit(bounds, padding) {
      self.fitted = Some((*bounds, padding));
      self.unspiderfy();
    }
  }

  fn has_marker(&self, id: &ProjectId) -> bool {
    self.index_of(id).is_some()
  }

  fn is_clustered(&self, id: &ProjectId) -> bool {
    let Some(index) = self.index_of(id) else {
      return false;
    };
    self
      .cluster_of(index)
      .is_some_and(|c| self.spiderfied.as_ref() != Some(&c.members))
  }

  fn spiderfy(&mut self, id: &ProjectId) {
    if let Some(cluster) = self.index_of(id).and_then(|i| self.cluster_of(i)) {
      self.disclose(cluster.members);
    }
  }

  fn open_popup(&mut self, id: &ProjectId) {
    if self.has_marker(id) {
      self.open_popup = Some(id.clone());
    }
  }

  fn focus(&mut self, position: WGS84Coordinate, zoom: u8) {
    self.view.set_view(position.into(), zoom);
    self.fitted = None;
    self.unspiderfy();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::project::ProjectRecord;

  fn marker(id: &str, lat: f32, lon: f32, category: Category) -> Marker {
    let record = ProjectRecord::new(id, id)
      .with_category(category)
      .with_location(WGS84Coordinate::new(lat, lon));
    Marker::from_record(&record).expect("valid location")
  }

  fn layer_with(markers: Vec<Marker>, zoom: u8) -> ClusterLayer {
    let mut layer = ClusterLayer::new(&MapSettings::default());
    for m in markers {
      layer.add_marker(m);
    }
    layer.focus(WGS84Coordinate::new(40.7608, -111.891), zoom);
    layer
  }

  fn neighbours() -> Vec<Marker> {
    vec![
      marker("a", 40.7608, -111.891, Category::Parks),
      marker("b", 40.7609, -111.891, Category::Zoning),
      marker("c", 40.7608, -111.8909, Category::Zoning),
    ]
  }

  #[test]
  fn close_markers_cluster_until_clustering_is_disabled() {
    let layer = layer_with(neighbours(), 16);
    let clusters = layer.clusters();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec![0, 1, 2]);
    assert!(layer.is_clustered(&"b".into()));

    let layer = layer_with(neighbours(), 17);
    assert_eq!(layer.clusters().len(), 3);
    assert!(!layer.is_clustered(&"b".into()));
  }

  #[test]
  fn distant_markers_stay_apart() {
    let markers = vec![
      marker("a", 40.7608, -111.891, Category::Parks),
      marker("b", 40.70, -111.95, Category::Parks),
    ];
    let layer = layer_with(markers, 13);
    assert_eq!(layer.clusters().len(), 2);
    assert!(
      layer
        .items()
        .iter()
        .all(|item| matches!(item, MapItem::Pin { .. }))
    );
  }

  #[test]
  fn dominant_category_and_size() {
    let layer = layer_with(neighbours(), 10);
    let cluster = &layer.clusters()[0];
    assert_eq!(cluster.dominant_category(layer.markers()), Category::Zoning);
    assert_eq!(cluster.size_class(), SizeClass::Small);

    let tie = Cluster {
      members: vec![0, 1],
      anchor: PixelCoordinate::default(),
    };
    assert_eq!(tie.dominant_category(layer.markers()), Category::Zoning);
    assert_eq!(SizeClass::from_count(11), SizeClass::Medium);
    assert_eq!(SizeClass::from_count(51), SizeClass::Large);
    assert_eq!(SizeClass::from_count(50), SizeClass::Medium);
  }

  #[test]
  fn spiderfy_discloses_cluster_members() {
    let mut layer = layer_with(neighbours(), 16);
    layer.spiderfy(&"c".into());
    assert!(!layer.is_clustered(&"c".into()));
    let legs = layer
      .items()
      .iter()
      .filter(|item| matches!(item, MapItem::SpiderLeg { .. }))
      .count();
    assert_eq!(legs, 3);

    layer.zoom_around(-1, PixelPosition::new(400., 300.));
    assert!(layer.is_clustered(&"c".into()));
  }

  #[test]
  fn cluster_click_zooms_in_before_spiderfying() {
    let mut layer = layer_with(neighbours(), 10);
    let members = layer.clusters()[0].members.clone();
    layer.click_cluster(&members);
    assert!(layer.view().zoom() > 10);

    let mut layer = layer_with(
      vec![
        marker("a", 40.7608, -111.891, Category::Parks),
        marker("b", 40.7608, -111.891, Category::Parks),
      ],
      16,
    );
    let mut settings = MapSettings::default();
    settings.cluster.disable_clustering_at_zoom = 30;
    layer.settings = settings.cluster;
    layer.focus(WGS84Coordinate::new(40.7608, -111.891), MAX_ZOOM);
    layer.click_cluster(&[0, 1]);
    assert_eq!(layer.view().zoom(), MAX_ZOOM);
    assert!(!layer.is_clustered(&"a".into()));
  }

  #[test]
  fn hit_testing() {
    let layer = layer_with(
      vec![
        marker("a", 40.7608, -111.891, Category::Parks),
        marker("b", 40.70, -111.95, Category::Parks),
      ],
      13,
    );
    let on_a = layer.view().to_screen(WGS84Coordinate::new(40.7608, -111.891).into());
    assert_eq!(layer.hit(on_a), Some(MapHit::Marker("a".into())));
    assert_eq!(layer.hit(on_a + PixelPosition::new(200., 0.)), None);

    let clustered = layer_with(neighbours(), 16);
    let center = clustered.view().to_screen(clustered.clusters()[0].anchor);
    assert_eq!(clustered.hit(center), Some(MapHit::Cluster(vec![0, 1, 2])));
  }

  fn on_screen(layer: &ClusterLayer) -> bool {
    let size = layer.view().size();
    layer.markers().iter().all(|m| {
      let p = layer.view().to_screen(m.position.into());
      (0.0..=size.x).contains(&p.x) && (0.0..=size.y).contains(&p.y)
    })
  }

  fn west_and_east() -> Vec<Marker> {
    vec![
      marker("west", 40.7, -112.10, Category::Parks),
      marker("east", 40.7, -111.70, Category::Parks),
    ]
  }

  #[test]
  fn fitted_bounds_follow_the_first_real_size() {
    let mut layer = layer_with(west_and_east(), 12);
    layer.fit_bounds(&layer.marker_bounds(), 50.);
    assert_eq!(layer.view().zoom(), 11);

    layer.set_viewport_size(PixelPosition::new(560., 700.));
    assert_eq!(layer.view().zoom(), 10);
    assert!(on_screen(&layer));
  }

  #[test]
  fn moved_view_is_not_fitted_again() {
    let mut layer = layer_with(west_and_east(), 12);
    layer.fit_bounds(&layer.marker_bounds(), 50.);
    layer.pan(PixelPosition::new(30., 0.));
    let center = layer.view().center();

    layer.set_viewport_size(PixelPosition::new(560., 700.));
    assert_eq!(layer.view().zoom(), 11);
    assert_eq!(layer.view().center(), center);
  }

  #[test]
  fn coverage_spans_cluster_members() {
    let layer = layer_with(neighbours(), 16);
    let (min, max) = layer.coverage(&[0, 1, 2]).expect("members are spread");
    for m in layer.markers() {
      let p = layer.view().to_screen(m.position.into());
      assert!(min.x <= p.x && p.x <= max.x);
      assert!(min.y <= p.y && p.y <= max.y);
    }
    assert!(layer.coverage(&[0]).is_none());
  }

  #[test]
  fn popup_only_for_known_markers() {
    let mut layer = layer_with(neighbours(), 16);
    layer.open_popup(&"missing".into());
    assert!(layer.popup().is_none());
    layer.open_popup(&"a".into());
    assert_eq!(layer.popup().map(|m| m.id.as_str()), Some("a"));
    layer.clear_markers();
    assert!(layer.popup().is_none());
  }
}

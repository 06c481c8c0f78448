//! Keeps the map markers and the project list showing the same projects.
//!
//! Both outputs are abstract surfaces, so the synchronization can run against
//! the egui viewer as well as against plain in-memory state.

use log::warn;

use crate::{
  map::coordinates::{BoundingBox, WGS84Coordinate},
  project::{Category, ProjectId, ProjectRecord},
};

/// Characters of the description shown on a list card.
pub const EXCERPT_CHARS: usize = 100;

/// Detail view of a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
  pub title: String,
  pub category: Category,
  pub year: String,
  pub status: String,
  pub description: String,
  /// E.g. `12.5 acres`.
  pub size: Option<String>,
  pub client: String,
  pub skills: Vec<String>,
  pub link: String,
}

impl Popup {
  #[must_use]
  pub fn from_record(record: &ProjectRecord) -> Self {
    Self {
      title: record.title.clone(),
      category: record.category,
      year: record.year.clone(),
      status: record.status.clone(),
      description: record.description.clone(),
      size: record.size_metric.map(|acres| format!("{acres} acres")),
      client: record.client.clone(),
      skills: record.skills.clone(),
      link: record.detail_link.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
  pub id: ProjectId,
  pub position: WGS84Coordinate,
  /// Used for pin color and the dominant type of clusters.
  pub category: Category,
  pub title: String,
  pub popup: Popup,
}

impl Marker {
  /// `None` if the record has no placeable location.
  #[must_use]
  pub fn from_record(record: &ProjectRecord) -> Option<Self> {
    Some(Self {
      id: record.id.clone(),
      position: record.valid_location()?,
      category: record.category,
      title: record.title.clone(),
      popup: Popup::from_record(record),
    })
  }
}

/// A card in the project list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
  pub id: ProjectId,
  pub title: String,
  pub category: Category,
  pub year: String,
  pub status: String,
  pub excerpt: String,
}

impl ListEntry {
  #[must_use]
  pub fn from_record(record: &ProjectRecord) -> Self {
    Self {
      id: record.id.clone(),
      title: record.title.clone(),
      category: record.category,
      year: record.year.clone(),
      status: record.status.clone(),
      excerpt: record.excerpt(EXCERPT_CHARS),
    }
  }
}

/// Shown instead of an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
  pub title: &'static str,
  pub hint: &'static str,
}

pub const NO_PROJECTS: EmptyState = EmptyState {
  title: "No projects found",
  hint: "Try changing your filter criteria",
};

/// The map side: a marker layer with clustering, popups and a view.
pub trait MarkerSurface {
  fn clear_markers(&mut self);
  fn add_marker(&mut self, marker: Marker);
  /// Covers all current markers. Invalid if there are none.
  fn marker_bounds(&self) -> BoundingBox;
  fn fit_bounds(&mut self, bounds: &BoundingBox, padding: f32);
  fn has_marker(&self, id: &ProjectId) -> bool;
  /// The marker is currently absorbed into a cluster.
  fn is_clustered(&self, id: &ProjectId) -> bool;
  /// Discloses the members of the cluster holding `id`.
  fn spiderfy(&mut self, id: &ProjectId);
  fn open_popup(&mut self, id: &ProjectId);
  fn focus(&mut self, position: WGS84Coordinate, zoom: u8);
}

/// The sidebar side: project cards, a placeholder and a counter.
pub trait ListSurface {
  /// Replaces all entries. Clears the active entry.
  fn show_entries(&mut self, entries: Vec<ListEntry>);
  fn show_empty_state(&mut self, state: &EmptyState);
  fn set_visible_count(&mut self, count: usize);
  fn has_entry(&self, id: &ProjectId) -> bool;
  /// Makes `id` the only active entry.
  fn set_active(&mut self, id: &ProjectId);
  fn active(&self) -> Option<&ProjectId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
  pub rendered: usize,
  pub skipped: usize,
  pub fitted: bool,
}

/// Rebuilds markers and list from one snapshot of the visible projects.
///
/// Markers are replaced in full. Projects without a placeable location are
/// listed and counted but get no marker. The view is fitted to the markers
/// if there are any.
pub fn synchronize<M, L>(
  visible: &[&ProjectRecord],
  markers: &mut M,
  list: &mut L,
  padding: f32,
) -> RenderSummary
where
  M: MarkerSurface + ?Sized,
  L: ListSurface + ?Sized,
{
  let mut summary = RenderSummary::default();

  markers.clear_markers();
  for record in visible {
    if let Some(marker) = Marker::from_record(record) {
      markers.add_marker(marker);
      summary.rendered += 1;
    } else {
      warn!("Project {} missing coordinates", record.id);
      summary.skipped += 1;
    }
  }

  if summary.rendered > 0 {
    let bounds = markers.marker_bounds();
    if bounds.is_valid() {
      markers.fit_bounds(&bounds, padding);
      summary.fitted = true;
    }
  }

  if visible.is_empty() {
    list.show_empty_state(&NO_PROJECTS);
  } else {
    list.show_entries(visible.iter().map(|r| ListEntry::from_record(r)).collect());
  }
  list.set_visible_count(visible.len());

  summary
}

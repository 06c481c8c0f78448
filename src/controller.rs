//! Owns the loaded projects, the current filter and both outputs.

use log::info;

use crate::{
  config::MapSettings,
  filter::{FilterOptions, FilterSelection, filter_indices},
  loader::{DataOrigin, Dataset},
  project::{ProjectId, ProjectRecord},
  render::{ListSurface, MarkerSurface, RenderSummary, synchronize},
  selection::SelectionBridge,
};

pub struct ProjectController<M: MarkerSurface, L: ListSurface> {
  all: Vec<ProjectRecord>,
  /// Indices into `all`, in order.
  filtered: Vec<usize>,
  selection: FilterSelection,
  bridge: SelectionBridge,
  markers: M,
  list: L,
  settings: MapSettings,
  origin: Option<DataOrigin>,
}

impl<M: MarkerSurface, L: ListSurface> ProjectController<M, L> {
  pub fn new(markers: M, list: L, settings: MapSettings) -> Self {
    Self {
      all: Vec::new(),
      filtered: Vec::new(),
      selection: FilterSelection::default(),
      bridge: SelectionBridge::new(settings.focus_zoom),
      markers,
      list,
      settings,
      origin: None,
    }
  }

  /// Replaces all projects and renders them with the current filter.
  pub fn install(&mut self, dataset: Dataset) -> RenderSummary {
    info!(
      "Showing {} projects from {:?}",
      dataset.projects.len(),
      dataset.origin
    );
    self.all = dataset.projects;
    self.origin = Some(dataset.origin);
    self.apply_filters(self.selection.clone())
  }

  pub fn apply_filters(&mut self, selection: FilterSelection) -> RenderSummary {
    self.filtered = filter_indices(&self.all, &selection);
    self.selection = selection;
    let visible: Vec<&ProjectRecord> = self.filtered.iter().map(|i| &self.all[*i]).collect();
    synchronize(
      &visible,
      &mut self.markers,
      &mut self.list,
      self.settings.fit_padding,
    )
  }

  pub fn clear_filters(&mut self) -> RenderSummary {
    self.apply_filters(FilterSelection::default())
  }

  pub fn select_from_list(&mut self, id: &ProjectId) -> bool {
    let visible: Vec<&ProjectRecord> = self.filtered.iter().map(|i| &self.all[*i]).collect();
    self
      .bridge
      .select_from_list(id, &visible, &mut self.markers, &mut self.list)
  }

  pub fn marker_clicked(&mut self, id: &ProjectId) -> bool {
    self.bridge.marker_clicked(id, &mut self.list)
  }

  #[must_use]
  pub fn all_projects(&self) -> &[ProjectRecord] {
    &self.all
  }

  #[must_use]
  pub fn filtered_projects(&self) -> Vec<&ProjectRecord> {
    self.filtered.iter().map(|i| &self.all[*i]).collect()
  }

  #[must_use]
  pub fn selection(&self) -> &FilterSelection {
    &self.selection
  }

  #[must_use]
  pub fn filter_options(&self) -> FilterOptions {
    FilterOptions::from_projects(&self.all)
  }

  #[must_use]
  pub fn origin(&self) -> Option<&DataOrigin> {
    self.origin.as_ref()
  }

  #[must_use]
  pub fn markers(&self) -> &M {
    &self.markers
  }

  pub fn markers_mut(&mut self) -> &mut M {
    &mut self.markers
  }

  #[must_use]
  pub fn list(&self) -> &L {
    &self.list
  }

  pub fn list_mut(&mut self) -> &mut L {
    &mut self.list
  }
}

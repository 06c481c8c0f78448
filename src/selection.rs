use log::debug;

use crate::{
  project::{ProjectId, ProjectRecord},
  render::{ListSurface, MarkerSurface},
};

/// Links list cards and map markers by project id.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBridge {
  focus_zoom: u8,
}

impl SelectionBridge {
  #[must_use]
  pub fn new(focus_zoom: u8) -> Self {
    Self { focus_zoom }
  }

  /// A list card was chosen: center the map on the project, disclose its
  /// cluster if needed, open the popup and highlight the card.
  ///
  /// Ids outside `visible` or without a marker leave everything untouched.
  /// Returns whether the selection was applied.
  pub fn select_from_list<M, L>(
    &self,
    id: &ProjectId,
    visible: &[&ProjectRecord],
    markers: &mut M,
    list: &mut L,
  ) -> bool
  where
    M: MarkerSurface + ?Sized,
    L: ListSurface + ?Sized,
  {
    let Some(location) = visible
      .iter()
      .find(|r| &r.id == id)
      .and_then(|r| r.valid_location())
    else {
      debug!("Ignoring selection of {id}, not on the map");
      return false;
    };
    if !markers.has_marker(id) {
      debug!("Ignoring selection of {id}, no marker");
      return false;
    }

    markers.focus(location, self.focus_zoom);
    if markers.is_clustered(id) {
      markers.spiderfy(id);
    }
    markers.open_popup(id);
    list.set_active(id);
    true
  }

  /// A marker was clicked: its popup is opened by the map itself, the list
  /// only highlights the matching card.
  pub fn marker_clicked<L: ListSurface + ?Sized>(&self, id: &ProjectId, list: &mut L) -> bool {
    if list.has_entry(id) {
      list.set_active(id);
      true
    } else {
      false
    }
  }
}

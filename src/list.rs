use crate::{
  project::ProjectId,
  render::{EmptyState, ListEntry, ListSurface, NO_PROJECTS},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ListContent {
  Entries(Vec<ListEntry>),
  Empty(EmptyState),
}

/// The sidebar list as plain state. The UI draws it and reports clicks back.
#[derive(Debug, Clone)]
pub struct ProjectList {
  content: ListContent,
  visible_count: usize,
  active: Option<ProjectId>,
  scroll_request: Option<ProjectId>,
}

impl Default for ProjectList {
  fn default() -> Self {
    Self {
      content: ListContent::Empty(NO_PROJECTS),
      visible_count: 0,
      active: None,
      scroll_request: None,
    }
  }
}

impl ProjectList {
  #[must_use]
  pub fn content(&self) -> &ListContent {
    &self.content
  }

  #[must_use]
  pub fn visible_count(&self) -> usize {
    self.visible_count
  }

  #[must_use]
  pub fn is_active(&self, id: &ProjectId) -> bool {
    self.active.as_ref() == Some(id)
  }

  /// The card that should be scrolled into view, once.
  pub fn take_scroll_request(&mut self) -> Option<ProjectId> {
    self.scroll_request.take()
  }
}

impl ListSurface for ProjectList {
  fn show_entries(&mut self, entries: Vec<ListEntry>) {
    self.content = ListContent::Entries(entries);
    self.active = None;
    self.scroll_request = None;
  }

  fn show_empty_state(&mut self, state: &EmptyState) {
    self.content = ListContent::Empty(state.clone());
    self.active = None;
    self.scroll_request = None;
  }

  fn set_visible_count(&mut self, count: usize) {
    self.visible_count = count;
  }

  fn has_entry(&self, id: &ProjectId) -> bool {
    match &self.content {
      ListContent::Entries(entries) => entries.iter().any(|e| &e.id == id),
      ListContent::Empty(_) => false,
    }
  }

  fn set_active(&mut self, id: &ProjectId) {
    if self.has_entry(id) {
      self.active = Some(id.clone());
      self.scroll_request = Some(id.clone());
    }
  }

  fn active(&self) -> Option<&ProjectId> {
    self.active.as_ref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::project::ProjectRecord;

  fn entries(ids: &[&str]) -> Vec<ListEntry> {
    ids
      .iter()
      .map(|id| ListEntry::from_record(&ProjectRecord::new(*id, "t")))
      .collect()
  }

  #[test]
  fn at_most_one_active_entry() {
    let mut list = ProjectList::default();
    list.show_entries(entries(&["a", "b"]));
    list.set_active(&"a".into());
    list.set_active(&"b".into());
    assert!(!list.is_active(&"a".into()));
    assert!(list.is_active(&"b".into()));
    assert_eq!(list.take_scroll_request(), Some("b".into()));
    assert_eq!(list.take_scroll_request(), None);
  }

  #[test]
  fn unknown_entry_does_not_change_highlight() {
    let mut list = ProjectList::default();
    list.show_entries(entries(&["a"]));
    list.set_active(&"a".into());
    list.set_active(&"zzz".into());
    assert_eq!(list.active(), Some(&"a".into()));
  }

  #[test]
  fn rebuild_clears_highlight() {
    let mut list = ProjectList::default();
    list.show_entries(entries(&["a"]));
    list.set_active(&"a".into());
    list.show_entries(entries(&["a"]));
    assert_eq!(list.active(), None);
    list.show_empty_state(&NO_PROJECTS);
    assert!(!list.has_entry(&"a".into()));
  }
}

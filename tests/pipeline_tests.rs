use futures::executor::block_on;
use projectmap::{
  config::{DEFAULT_CENTER, MapSettings},
  controller::ProjectController,
  filter::FilterSelection,
  list::{ListContent, ProjectList},
  loader::{DataOrigin, DataSource, Dataset, load_dataset},
  map::cluster_layer::ClusterLayer,
  parser::GeoJsonNormalizer,
  project::Category,
  render::{ListSurface, MarkerSurface},
};

type Controller = ProjectController<ClusterLayer, ProjectList>;

fn load(path: &str) -> Dataset {
  let normalizer = GeoJsonNormalizer::new(DEFAULT_CENTER).with_default_year("2025");
  block_on(load_dataset(&DataSource::parse(path), &normalizer))
}

fn controller_with(dataset: Dataset) -> Controller {
  let settings = MapSettings::default();
  let mut controller =
    ProjectController::new(ClusterLayer::new(&settings), ProjectList::default(), settings);
  controller.install(dataset);
  controller
}

fn listed_ids(controller: &Controller) -> Vec<String> {
  match controller.list().content() {
    ListContent::Entries(entries) => entries.iter().map(|e| e.id.to_string()).collect(),
    ListContent::Empty(_) => Vec::new(),
  }
}

#[test]
fn fixture_is_normalized_in_feature_order() {
  let dataset = load("tests/resources/projects.geojson");
  assert_eq!(
    dataset.origin,
    DataOrigin::Source("tests/resources/projects.geojson".to_string())
  );
  let ids: Vec<_> = dataset.projects.iter().map(|p| p.id.to_string()).collect();
  assert_eq!(ids, vec!["101", "102", "103", "104", "7"]);

  let park = &dataset.projects[0];
  assert_eq!(park.title, "Liberty Park");
  assert_eq!(park.category, Category::Parks);
  assert_eq!(park.year, "2022");
  assert_eq!(park.size_metric, Some(80.));
  assert_eq!(park.skills, vec!["Master Planning", "Tree Inventory"]);

  assert_eq!(dataset.projects[1].category, Category::Environmental);
  assert_eq!(dataset.projects[1].detail_link, "https://example.org/projects/102");
  assert_eq!(dataset.projects[2].category, Category::Transportation);
  assert!(dataset.projects[2].location.is_some());
  assert!(dataset.projects[3].location.is_none());

  let trail = &dataset.projects[4];
  assert_eq!(trail.location, Some(DEFAULT_CENTER));
  assert_eq!(trail.year, "2021");
  assert_eq!(trail.status, "completed");
}

#[test]
fn unplaceable_projects_are_listed_without_marker() {
  let controller = controller_with(load("tests/resources/projects.geojson"));
  assert_eq!(controller.list().visible_count(), 5);
  assert_eq!(controller.markers().markers().len(), 4);
  assert!(!controller.markers().has_marker(&"104".into()));
  assert_eq!(listed_ids(&controller).len(), 5);
}

#[test]
fn filters_keep_map_and_list_in_sync() {
  let mut controller = controller_with(load("tests/resources/projects.geojson"));

  controller.apply_filters(FilterSelection::from_controls("2024", "all", "all").expect("valid"));
  assert_eq!(listed_ids(&controller), vec!["102", "103"]);
  assert_eq!(controller.markers().markers().len(), 2);

  let summary =
    controller.apply_filters(FilterSelection::from_controls("all", "zoning", "all").expect("valid"));
  assert_eq!(listed_ids(&controller), vec!["104"]);
  assert_eq!(summary.rendered, 0);
  assert!(!summary.fitted);

  controller.apply_filters(FilterSelection::from_controls("all", "all", "archived").expect("valid"));
  assert!(matches!(controller.list().content(), ListContent::Empty(_)));
  assert_eq!(controller.list().visible_count(), 0);
  assert!(controller.markers().markers().is_empty());

  controller.clear_filters();
  assert_eq!(controller.list().visible_count(), 5);
}

#[test]
fn selecting_a_clustered_project_discloses_it() {
  let mut controller = controller_with(load("tests/resources/projects.geojson"));
  assert!(controller.select_from_list(&"102".into()));

  let markers = controller.markers();
  assert_eq!(markers.view().zoom(), 16);
  assert!(!markers.is_clustered(&"102".into()));
  assert_eq!(markers.popup().map(|m| m.id.as_str()), Some("102"));
  assert_eq!(controller.list().active(), Some(&"102".into()));
}

#[test]
fn selecting_a_project_without_marker_changes_nothing() {
  let mut controller = controller_with(load("tests/resources/projects.geojson"));
  let view_before = *controller.markers().view();
  assert!(!controller.select_from_list(&"104".into()));
  assert_eq!(controller.markers().view(), &view_before);
  assert_eq!(controller.list().active(), None);
}

#[test]
fn marker_click_highlights_the_card() {
  let mut controller = controller_with(load("tests/resources/projects.geojson"));
  assert!(controller.marker_clicked(&"103".into()));
  assert_eq!(controller.list().active(), Some(&"103".into()));
}

#[test]
fn missing_source_falls_back_to_the_demo_projects() {
  let controller = controller_with(load("tests/resources/does_not_exist.geojson"));
  assert_eq!(controller.origin(), Some(&DataOrigin::Demo));
  assert_eq!(controller.list().visible_count(), 2);
  assert!(controller.markers().has_marker(&"1".into()));
  assert!(controller.markers().has_marker(&"2".into()));
}

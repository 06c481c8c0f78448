use std::sync::mpsc::channel;

use egui_kittest::Harness;
use egui_kittest::kittest::Queryable;
use projectmap::{config::MapSettings, loader::Dataset, projectmap_ui::ProjectMapApp};

fn demo_app() -> ProjectMapApp {
  let (sender, receiver) = channel();
  sender.send(Dataset::demo()).expect("receiver alive");
  ProjectMapApp::new(MapSettings::default(), receiver)
}

fn harness(app: ProjectMapApp) -> Harness<'static, ProjectMapApp> {
  let mut harness = Harness::new_ui_state(|ui, app: &mut ProjectMapApp| app.show(ui), app);
  harness.run();
  harness
}

#[test]
fn no_match_shows_empty_state() {
  let harness = harness(demo_app().with_filters("all", "zoning", "all"));

  harness.get_by_label("No projects found");
  harness.get_by_label("Try changing your filter criteria");
  harness.get_by_label("0 projects (sample data)");
}

#[test]
fn clear_filters_restores_all_projects() {
  let mut harness = harness(demo_app().with_filters("2023", "transportation", "all"));
  harness.get_by_label("1 projects (sample data)");

  harness.get_by_label("Clear Filters").click();
  harness.run();

  harness.get_by_label("2 projects (sample data)");
  assert!(harness.state().controller().selection().is_wildcard());
  assert!(harness.query_by_label("No projects found").is_none());
}

#[test]
fn clicking_a_card_activates_it_and_opens_the_popup() {
  let mut harness = harness(demo_app());
  assert!(harness.query_by_label("View Project Details").is_none());

  harness.get_by_label("Downtown Park Redevelopment").click();
  harness.run();

  let list = harness.state().controller().list();
  assert!(list.is_active(&"1".into()));
  assert!(!list.is_active(&"2".into()));
  harness.get_by_label("View Project Details");
  harness.get_by_label("Client:");
}

use std::sync::mpsc::{Receiver, channel};

use egui::{Color32, RichText, Widget as _};
use log::{error, warn};

use crate::{
  config::MapSettings,
  controller::ProjectController,
  filter::{FilterSelection, WILDCARD},
  list::{ListContent, ProjectList},
  loader::{DataOrigin, DataSource, Dataset, load_dataset},
  map::{
    cluster_layer::ClusterLayer,
    marker_canvas::{MarkerCanvas, show_popup},
  },
  parser::GeoJsonNormalizer,
  project::{Category, ProjectId},
  render::{ListEntry, ListSurface},
};

/// Loads the dataset on a background thread. The result arrives on the
/// returned channel, followed by a repaint of `ctx`.
pub fn spawn_loader(
  runtime: tokio::runtime::Runtime,
  source: DataSource,
  normalizer: GeoJsonNormalizer,
  ctx: egui::Context,
) -> Receiver<Dataset> {
  let (sender, receiver) = channel();
  std::thread::spawn(move || {
    let dataset = runtime.block_on(load_dataset(&source, &normalizer));
    if sender.send(dataset).is_err() {
      error!("Viewer closed before the projects were loaded");
    }
    ctx.request_repaint();
  });
  receiver
}

/// Raw values of the three filter dropdowns.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterControls {
  year: String,
  category: String,
  status: String,
}

impl Default for FilterControls {
  fn default() -> Self {
    Self {
      year: WILDCARD.to_string(),
      category: WILDCARD.to_string(),
      status: WILDCARD.to_string(),
    }
  }
}

/// Holds the UI data of the project map.
pub struct ProjectMapApp {
  controller: ProjectController<ClusterLayer, ProjectList>,
  datasets: Receiver<Dataset>,
  controls: FilterControls,
  loading: bool,
}

impl ProjectMapApp {
  #[must_use]
  pub fn new(settings: MapSettings, datasets: Receiver<Dataset>) -> Self {
    Self {
      controller: ProjectController::new(
        ClusterLayer::new(&settings),
        ProjectList::default(),
        settings,
      ),
      datasets,
      controls: FilterControls::default(),
      loading: true,
    }
  }

  /// Starts with the given dropdown values instead of "all".
  #[must_use]
  pub fn with_filters(mut self, year: &str, category: &str, status: &str) -> Self {
    self.controls = FilterControls {
      year: year.to_string(),
      category: category.to_string(),
      status: status.to_string(),
    };
    self.apply_controls();
    self
  }

  #[must_use]
  pub fn controller(&self) -> &ProjectController<ClusterLayer, ProjectList> {
    &self.controller
  }

  /// Draws the sidebar and the map into `ui`.
  pub fn show(&mut self, ui: &mut egui::Ui) {
    self.receive_datasets();

    egui::Panel::left("sidebar")
      .default_size(340.)
      .size_range(260.0..=520.0)
      .resizable(true)
      .show_inside(ui, |ui| self.sidebar_ui(ui));

    egui::CentralPanel::no_frame().show_inside(ui, |ui| self.map_ui(ui));
  }

  fn receive_datasets(&mut self) {
    while let Ok(dataset) = self.datasets.try_recv() {
      self.loading = false;
      self.controller.install(dataset);
    }
  }

  fn apply_controls(&mut self) {
    match FilterSelection::from_controls(
      &self.controls.year,
      &self.controls.category,
      &self.controls.status,
    ) {
      Ok(selection) => {
        self.controller.apply_filters(selection);
      }
      Err(e) => warn!("Ignoring filter change: {e}"),
    }
  }

  fn filter_ui(&mut self, ui: &mut egui::Ui) {
    let options = self.controller.filter_options();
    let before = self.controls.clone();

    ui.horizontal_wrapped(|ui| {
      dropdown(ui, "year_filter", "All Years", &mut self.controls.year, &options.years);
      let categories: Vec<String> = options.categories.iter().map(ToString::to_string).collect();
      dropdown(
        ui,
        "category_filter",
        "All Categories",
        &mut self.controls.category,
        &categories,
      );
      dropdown(
        ui,
        "status_filter",
        "All Statuses",
        &mut self.controls.status,
        &options.statuses,
      );
    });

    if ui.button("Clear Filters").clicked() {
      self.controls = FilterControls::default();
    }

    if self.controls != before {
      self.apply_controls();
    }
  }

  fn list_ui(&mut self, ui: &mut egui::Ui) {
    let scroll_to = self.controller.list_mut().take_scroll_request();
    let mut selected: Option<ProjectId> = None;

    egui::ScrollArea::vertical()
      .auto_shrink([false; 2])
      .show(ui, |ui| match self.controller.list().content() {
        ListContent::Empty(state) => {
          ui.vertical_centered(|ui| {
            ui.add_space(24.);
            ui.heading(state.title);
            ui.label(RichText::new(state.hint).weak());
          });
        }
        ListContent::Entries(entries) => {
          for entry in entries {
            let active = self.controller.list().is_active(&entry.id);
            let response = project_card(ui, entry, active);
            if scroll_to.as_ref() == Some(&entry.id) {
              response.scroll_to_me(Some(egui::Align::Center));
            }
            if response.clicked() {
              selected = Some(entry.id.clone());
            }
          }
        }
      });

    if let Some(id) = selected {
      self.controller.select_from_list(&id);
    }
  }

  fn sidebar_ui(&mut self, ui: &mut egui::Ui) {
    ui.heading("Project Portfolio");
    let count = self.controller.list().visible_count();
    let mut summary = format!("{count} projects");
    if self.controller.origin() == Some(&DataOrigin::Demo) {
      summary.push_str(" (sample data)");
    }
    ui.label(summary);
    ui.separator();
    self.filter_ui(ui);
    ui.separator();
    self.list_ui(ui);
  }

  fn map_ui(&mut self, ui: &mut egui::Ui) {
    let highlighted = self.controller.list().active().cloned();
    let mut clicked = None;
    let response = MarkerCanvas::new(self.controller.markers_mut(), &mut clicked)
      .highlighted(highlighted)
      .ui(ui);
    show_popup(ui, self.controller.markers_mut(), response.rect);

    if let Some(id) = clicked {
      self.controller.marker_clicked(&id);
    }

    if self.loading {
      ui.painter().text(
        response.rect.center(),
        egui::Align2::CENTER_CENTER,
        "Loading projects...",
        egui::FontId::proportional(18.),
        Color32::DARK_GRAY,
      );
    }
  }
}

fn dropdown(ui: &mut egui::Ui, salt: &str, all_label: &str, value: &mut String, options: &[String]) {
  let selected_text = if value.as_str() == WILDCARD {
    all_label.to_string()
  } else {
    value.clone()
  };
  egui::ComboBox::from_id_salt(salt)
    .selected_text(selected_text)
    .show_ui(ui, |ui| {
      ui.selectable_value(value, WILDCARD.to_string(), all_label);
      for option in options {
        ui.selectable_value(value, option.clone(), option);
      }
    });
}

fn category_badge(category: Category) -> RichText {
  RichText::new(category.name().to_uppercase())
    .small()
    .color(Color32::WHITE)
    .background_color(category.color())
}

fn project_card(ui: &mut egui::Ui, entry: &ListEntry, active: bool) -> egui::Response {
  let stroke = if active {
    egui::Stroke::new(2., entry.category.color())
  } else {
    egui::Stroke::new(1., Color32::from_gray(210))
  };
  let card = egui::Frame::group(ui.style())
    .stroke(stroke)
    .show(ui, |ui| {
      ui.set_width(ui.available_width());
      let title = ui.add(
        egui::Label::new(RichText::new(&entry.title).strong())
          .selectable(false)
          .sense(egui::Sense::click()),
      );
      ui.horizontal(|ui| {
        ui.label(category_badge(entry.category));
        ui.label(format!("{} • {}", entry.year, entry.status));
      });
      ui.label(RichText::new(&entry.excerpt).weak());
      title
    });
  card.response.interact(egui::Sense::click()) | card.inner
}

impl eframe::App for ProjectMapApp {
  fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
    self.show(ui);
  }
}

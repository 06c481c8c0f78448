use egui::{
  Align2, Color32, FontId, Painter, PointerButton, Pos2, Rect, Response, RichText, Sense, Stroke,
  StrokeKind, Ui, Widget,
};
use log::{info, warn};

use super::{
  cluster_layer::{ClusterLayer, MapHit, MapItem, SizeClass},
  coordinates::PixelPosition,
};
use crate::{
  project::{Category, ProjectId},
  render::MarkerSurface,
};

const PIN_RADIUS: f32 = 12.;
const LEG_COLOR: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0xff, 0xc1, 0x07);
const COVERAGE_COLOR: Color32 = Color32::from_rgb(0x33, 0x88, 0xff);

fn cluster_radius(size: SizeClass) -> f32 {
  match size {
    SizeClass::Small => 18.,
    SizeClass::Medium => 22.,
    SizeClass::Large => 26.,
  }
}

/// Draws the marker layer and turns pointer input into view changes.
///
/// A clicked marker opens its popup and is reported through `clicked`.
pub struct MarkerCanvas<'a> {
  layer: &'a mut ClusterLayer,
  highlighted: Option<ProjectId>,
  clicked: &'a mut Option<ProjectId>,
}

impl<'a> MarkerCanvas<'a> {
  pub fn new(layer: &'a mut ClusterLayer, clicked: &'a mut Option<ProjectId>) -> Self {
    Self {
      layer,
      highlighted: None,
      clicked,
    }
  }

  /// The marker of the active list card is drawn with a ring.
  #[must_use]
  pub fn highlighted(mut self, id: Option<ProjectId>) -> Self {
    self.highlighted = id;
    self
  }

  fn handle_mouse_wheel(&mut self, ui: &Ui, response: &Response, rect: Rect) {
    if !response.hovered() {
      return;
    }
    let delta = ui.input(|i| {
      i.events.iter().find_map(|e| match e {
        egui::Event::MouseWheel { delta, .. } => Some(delta.y),
        _ => None,
      })
    });
    if let Some(delta) = delta
      && delta != 0.
    {
      let anchor = response.hover_pos().unwrap_or(rect.center()) - rect.min;
      let steps = if delta > 0. { 1 } else { -1 };
      self.layer.zoom_around(steps, anchor.into());
    }
  }

  fn handle_click(&mut self, pos: Pos2, rect: Rect) {
    match self.layer.hit((pos - rect.min).into()) {
      Some(MapHit::Marker(id)) => {
        self.layer.open_popup(&id);
        *self.clicked = Some(id);
      }
      Some(MapHit::Cluster(members)) => self.layer.click_cluster(&members),
      None => self.layer.close_popup(),
    }
  }

  /// Outlines the area spanned by a hovered cluster.
  fn draw_coverage(&self, painter: &Painter, rect: Rect, members: &[usize]) {
    if let Some((min, max)) = self.layer.coverage(members) {
      let offset = rect.min.to_vec2();
      painter.rect_stroke(
        Rect::from_min_max(Pos2::from(min) + offset, Pos2::from(max) + offset),
        0.,
        Stroke::new(2., COVERAGE_COLOR),
        StrokeKind::Middle,
      );
    }
  }

  fn draw(&self, painter: &Painter, rect: Rect) {
    let to_screen = |p: PixelPosition| Pos2::from(p) + rect.min.to_vec2();
    let markers = self.layer.markers();
    for item in self.layer.items() {
      match item {
        MapItem::Pin { index, position } => {
          let marker = &markers[index];
          let ring = self.highlighted.as_ref() == Some(&marker.id);
          draw_pin(painter, to_screen(position), marker.category, ring);
        }
        MapItem::SpiderLeg {
          index,
          anchor,
          position,
        } => {
          let marker = &markers[index];
          let ring = self.highlighted.as_ref() == Some(&marker.id);
          painter.line_segment(
            [to_screen(anchor), to_screen(position)],
            Stroke::new(1.5, LEG_COLOR),
          );
          draw_pin(painter, to_screen(position), marker.category, ring);
        }
        MapItem::Group {
          members,
          position,
          size,
          dominant,
        } => {
          let center = to_screen(position);
          let radius = cluster_radius(size);
          painter.circle_filled(center, radius + 4., dominant.color().gamma_multiply(0.4));
          painter.circle(center, radius, dominant.color(), Stroke::new(3., Color32::WHITE));
          painter.text(
            center,
            Align2::CENTER_CENTER,
            members.len().to_string(),
            FontId::proportional(14.),
            Color32::WHITE,
          );
        }
      }
    }
  }
}

fn draw_pin(painter: &Painter, center: Pos2, category: Category, ring: bool) {
  if ring {
    painter.circle_stroke(center, PIN_RADIUS + 4., Stroke::new(3., HIGHLIGHT_COLOR));
  }
  painter.circle(
    center,
    PIN_RADIUS,
    category.color(),
    Stroke::new(2., Color32::WHITE),
  );
  painter.text(
    center,
    Align2::CENTER_CENTER,
    category.glyph(),
    FontId::proportional(11.),
    Color32::WHITE,
  );
}

impl Widget for MarkerCanvas<'_> {
  fn ui(mut self, ui: &mut Ui) -> Response {
    let size = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    self
      .layer
      .set_viewport_size(PixelPosition::new(rect.width(), rect.height()));

    self.handle_mouse_wheel(ui, &response, rect);

    if response.dragged() && response.dragged_by(PointerButton::Primary) {
      self.layer.pan(response.drag_delta().into());
    }

    if response.clicked()
      && let Some(pos) = response.interact_pointer_pos()
    {
      self.handle_click(pos, rect);
    }

    let hovered = response
      .hover_pos()
      .and_then(|pos| self.layer.hit((pos - rect.min).into()));

    if ui.is_rect_visible(rect) {
      let painter = ui.painter_at(rect);
      painter.rect_filled(rect, 0., Color32::from_rgb(0xe8, 0xec, 0xef));
      if let Some(MapHit::Cluster(members)) = &hovered {
        self.draw_coverage(&painter, rect, members);
      }
      self.draw(&painter, rect);
    }

    let title = match &hovered {
      Some(MapHit::Marker(id)) => self
        .layer
        .markers()
        .iter()
        .find(|m| &m.id == id)
        .map(|m| m.title.clone()),
      _ => None,
    };
    match title {
      Some(title) => response.on_hover_text(title),
      None => response,
    }
  }
}

/// Shows the popup of the open marker next to it. Closing the window closes
/// the popup.
pub fn show_popup(ui: &Ui, layer: &mut ClusterLayer, rect: Rect) {
  let Some(marker) = layer.popup() else {
    return;
  };
  let anchor = Pos2::from(layer.view().to_screen(marker.position.into())) + rect.min.to_vec2();
  let popup = marker.popup.clone();
  let mut open = true;

  egui::Window::new(RichText::new(&popup.title).strong())
    .id(egui::Id::new("project_popup"))
    .collapsible(false)
    .resizable(false)
    .fixed_pos(anchor + egui::vec2(16., -16.))
    .open(&mut open)
    .show(ui.ctx(), |ui| {
      ui.set_max_width(300.);
      ui.horizontal(|ui| {
        ui.label(
          RichText::new(popup.category.name().to_uppercase())
            .small()
            .color(Color32::WHITE)
            .background_color(popup.category.color()),
        );
        ui.label(format!("{} · {}", popup.year, popup.status));
      });
      ui.separator();
      ui.label(&popup.description);
      if let Some(size) = &popup.size {
        ui.horizontal(|ui| {
          ui.label("Size:");
          ui.strong(size);
        });
      }
      ui.horizontal(|ui| {
        ui.label("Client:");
        ui.strong(&popup.client);
      });
      if !popup.skills.is_empty() {
        ui.horizontal_wrapped(|ui| {
          for skill in &popup.skills {
            ui.label(RichText::new(skill).small().background_color(Color32::from_gray(230)));
          }
        });
      }
      ui.separator();
      if ui
        .add_enabled(popup.link != "#", egui::Button::new("View Project Details"))
        .clicked()
      {
        info!("Opening {}", popup.link);
        if let Err(e) = open::that(&popup.link) {
          warn!("Failed to open {}: {e}", popup.link);
        }
      }
    });

  if !open {
    layer.close_popup();
  }
}

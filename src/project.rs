use std::{fmt::Display, str::FromStr};

use chrono::Datelike;
use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::coordinates::WGS84Coordinate;

pub const DEFAULT_STATUS: &str = "completed";
pub const DEFAULT_CLIENT: &str = "City Planning Department";
pub const DEFAULT_LINK: &str = "#";
pub const DEFAULT_SKILLS: [&str; 3] = ["GIS Analysis", "Site Planning", "Public Engagement"];

/// The year used for records whose source does not name one.
#[must_use]
pub fn current_year() -> String {
  chrono::Local::now().year().to_string()
}

/// Identifies a project across the map and the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ProjectId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for ProjectId {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<usize> for ProjectId {
  fn from(value: usize) -> Self {
    Self(value.to_string())
  }
}

impl Display for ProjectId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown project category: {0}")]
pub struct UnknownCategory(pub String);

/// The closed set of project kinds. Decides pin color and cluster coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Parks,
  Transportation,
  Zoning,
  Environmental,
  #[default]
  Default,
}

impl Category {
  #[must_use]
  pub fn all() -> &'static [Category] {
    &[
      Category::Parks,
      Category::Transportation,
      Category::Zoning,
      Category::Environmental,
      Category::Default,
    ]
  }

  #[must_use]
  pub fn name(&self) -> &'static str {
    match self {
      Category::Parks => "parks",
      Category::Transportation => "transportation",
      Category::Zoning => "zoning",
      Category::Environmental => "environmental",
      Category::Default => "default",
    }
  }

  /// Used for pins, cards and popups.
  #[must_use]
  pub fn color(&self) -> Color32 {
    match self {
      Category::Parks => Color32::from_rgb(0x2E, 0x8B, 0x57),
      Category::Transportation => Color32::from_rgb(0x1E, 0x90, 0xFF),
      Category::Zoning => Color32::from_rgb(0xFF, 0x8C, 0x00),
      Category::Environmental => Color32::from_rgb(0x32, 0xCD, 0x32),
      Category::Default => Color32::from_rgb(0x4a, 0x64, 0x91),
    }
  }

  /// Short label drawn inside the pin.
  #[must_use]
  pub fn glyph(&self) -> &'static str {
    match self {
      Category::Parks => "P",
      Category::Transportation => "T",
      Category::Zoning => "Z",
      Category::Environmental => "E",
      Category::Default => "•",
    }
  }

  /// Infers the category from a free-text classification.
  ///
  /// Keywords are tested in priority order and the first match wins. Both a
  /// missing classification and one that matches nothing end up as `Parks`.
  #[must_use]
  pub fn infer(classification: Option<&str>) -> Category {
    let Some(text) = classification else {
      return Category::Parks;
    };
    let text = text.to_lowercase();
    if text.contains("transport") || text.contains("transit") {
      Category::Transportation
    } else if text.contains("zoning") {
      Category::Zoning
    } else if text.contains("environ") {
      Category::Environmental
    } else {
      Category::Parks
    }
  }
}

impl Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

impl FromStr for Category {
  type Err = UnknownCategory;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    Category::all()
      .iter()
      .find(|c| c.name() == input.to_lowercase())
      .copied()
      .ok_or_else(|| UnknownCategory(input.to_string()))
  }
}

/// A single portfolio project. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
  pub id: ProjectId,
  /// `None` if the source position was not a finite pair.
  pub location: Option<WGS84Coordinate>,
  pub category: Category,
  pub year: String,
  pub status: String,
  pub title: String,
  pub description: String,
  pub client: String,
  /// Acreage, only if the source has one.
  pub size_metric: Option<f64>,
  pub skills: Vec<String>,
  pub detail_link: String,
}

impl ProjectRecord {
  #[must_use]
  pub fn new(id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
    let title = title.into();
    Self {
      id: id.into(),
      location: None,
      category: Category::Default,
      year: current_year(),
      status: DEFAULT_STATUS.to_string(),
      description: format!("{title} - Urban planning project"),
      title,
      client: DEFAULT_CLIENT.to_string(),
      size_metric: None,
      skills: DEFAULT_SKILLS.iter().map(ToString::to_string).collect(),
      detail_link: DEFAULT_LINK.to_string(),
    }
  }

  #[must_use]
  pub fn with_location(mut self, location: WGS84Coordinate) -> Self {
    self.location = Some(location);
    self
  }

  #[must_use]
  pub fn with_category(mut self, category: Category) -> Self {
    self.category = category;
    self
  }

  #[must_use]
  pub fn with_year(mut self, year: impl Into<String>) -> Self {
    self.year = year.into();
    self
  }

  #[must_use]
  pub fn with_status(mut self, status: impl Into<String>) -> Self {
    self.status = status.into();
    self
  }

  #[must_use]
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  #[must_use]
  pub fn with_client(mut self, client: impl Into<String>) -> Self {
    self.client = client.into();
    self
  }

  #[must_use]
  pub fn with_size_metric(mut self, acres: f64) -> Self {
    self.size_metric = Some(acres);
    self
  }

  #[must_use]
  pub fn with_skills<S: Into<String>>(mut self, skills: impl IntoIterator<Item = S>) -> Self {
    self.skills = skills.into_iter().map(Into::into).collect();
    self
  }

  #[must_use]
  pub fn with_link(mut self, link: impl Into<String>) -> Self {
    self.detail_link = link.into();
    self
  }

  /// The location if it can be placed on the map.
  #[must_use]
  pub fn valid_location(&self) -> Option<WGS84Coordinate> {
    self.location.filter(WGS84Coordinate::is_valid)
  }

  /// The first `max_chars` characters of the description followed by `...`.
  #[must_use]
  pub fn excerpt(&self, max_chars: usize) -> String {
    let head: String = self.description.chars().take(max_chars).collect();
    format!("{head}...")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[rstest]
  #[case(Some("Transit Hub"), Category::Transportation)]
  #[case(Some("REGIONAL TRANSPORTATION"), Category::Transportation)]
  #[case(Some("zoning overlay"), Category::Zoning)]
  #[case(Some("Environmental Review"), Category::Environmental)]
  #[case(Some("transit zoning"), Category::Transportation)]
  #[case(Some("Neighborhood Park"), Category::Parks)]
  #[case(Some(""), Category::Parks)]
  #[case(None, Category::Parks)]
  fn infers_category(#[case] classification: Option<&str>, #[case] expected: Category) {
    assert_eq!(Category::infer(classification), expected);
  }

  #[test]
  fn category_names_round_trip() {
    for category in Category::all() {
      assert_eq!(category.name().parse::<Category>(), Ok(*category));
    }
    assert_eq!("Parks".parse::<Category>(), Ok(Category::Parks));
    assert!("playgrounds".parse::<Category>().is_err());
  }

  #[test]
  fn new_record_uses_defaults() {
    let record = ProjectRecord::new("7", "Riverside Trail");
    assert_eq!(record.id, ProjectId::from("7"));
    assert_eq!(record.year, current_year());
    assert_eq!(record.status, "completed");
    assert_eq!(record.client, "City Planning Department");
    assert_eq!(record.description, "Riverside Trail - Urban planning project");
    assert_eq!(record.detail_link, "#");
    assert_eq!(
      record.skills,
      vec!["GIS Analysis", "Site Planning", "Public Engagement"]
    );
    assert!(record.size_metric.is_none());
    assert!(record.valid_location().is_none());
  }

  #[test]
  fn excerpt_counts_characters() {
    let record = ProjectRecord::new("1", "x").with_description("é".repeat(120));
    let excerpt = record.excerpt(100);
    assert_eq!(excerpt.chars().count(), 103);
    assert!(excerpt.ends_with("..."));
  }

  #[test]
  fn out_of_range_location_is_not_valid() {
    let record = ProjectRecord::new("1", "x").with_location(WGS84Coordinate::new(95.0, 10.0));
    assert!(record.valid_location().is_none());
  }
}

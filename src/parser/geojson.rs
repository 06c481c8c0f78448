use serde_json::{Map, Value};

use crate::{
  map::coordinates::WGS84Coordinate,
  project::{
    Category, DEFAULT_CLIENT, DEFAULT_LINK, DEFAULT_SKILLS, DEFAULT_STATUS, ProjectId,
    ProjectRecord, current_year,
  },
};

type Properties = Map<String, Value>;

/// Where a feature ends up on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
  Found(WGS84Coordinate),
  /// No coordinates, or fewer than two components.
  Missing,
  /// Enough components, but not finite numbers.
  Malformed,
}

/// Turns `GeoJSON` features with source specific property names into
/// ``ProjectRecord``s.
#[derive(Debug, Clone)]
pub struct GeoJsonNormalizer {
  fallback: WGS84Coordinate,
  default_year: String,
}

impl GeoJsonNormalizer {
  /// `fallback` is used for features without usable coordinates.
  #[must_use]
  pub fn new(fallback: WGS84Coordinate) -> Self {
    Self {
      fallback,
      default_year: current_year(),
    }
  }

  #[must_use]
  pub fn with_default_year(mut self, year: impl Into<String>) -> Self {
    self.default_year = year.into();
    self
  }

  /// One record per feature, in feature order.
  #[must_use]
  pub fn normalize(&self, features: &[Value]) -> Vec<ProjectRecord> {
    features
      .iter()
      .enumerate()
      .map(|(index, feature)| self.normalize_feature(index, feature))
      .collect()
  }

  /// Never fails: every missing field gets its default.
  #[must_use]
  pub fn normalize_feature(&self, index: usize, feature: &Value) -> ProjectRecord {
    let empty = Properties::new();
    let props = feature
      .get("properties")
      .and_then(Value::as_object)
      .unwrap_or(&empty);

    let location = match Self::position(feature.get("geometry")) {
      Position::Found(coord) => Some(coord),
      Position::Missing => {
        log::warn!("Feature {index} has invalid coordinates");
        Some(self.fallback)
      }
      Position::Malformed => {
        log::warn!("Feature {index} has non-numeric coordinates");
        None
      }
    };

    let name = text(props, &["NAME"]);
    let title = name
      .clone()
      .or_else(|| text(props, &["PARK_NAME"]))
      .unwrap_or_else(|| format!("Project {}", index + 1));
    let description = text(props, &["DESCRIPTION"]).unwrap_or_else(|| {
      format!(
        "{} - Urban planning project",
        name.as_deref().unwrap_or("Project")
      )
    });

    ProjectRecord {
      id: text(props, &["OBJECTID", "FID"]).map_or_else(|| ProjectId::from(index), ProjectId::from),
      location,
      category: Category::infer(props.get("TYPE").and_then(Value::as_str)),
      year: text(props, &["YEAR", "YEAR_BUILT"]).unwrap_or_else(|| self.default_year.clone()),
      status: text(props, &["STATUS"]).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
      title,
      description,
      client: text(props, &["OWNER"]).unwrap_or_else(|| DEFAULT_CLIENT.to_string()),
      size_metric: number(props, &["ACRES", "Acres"]),
      skills: skills(props),
      detail_link: text(props, &["LINK", "URL"]).unwrap_or_else(|| DEFAULT_LINK.to_string()),
    }
  }

  /// Points are taken as they are. For lines and areas the center of their
  /// bounding box is used.
  fn position(geometry: Option<&Value>) -> Position {
    let Some(coords) = geometry
      .and_then(|g| g.get("coordinates"))
      .and_then(Value::as_array)
    else {
      return Position::Missing;
    };

    if coords.first().is_some_and(Value::is_array) {
      let mut positions = Vec::new();
      collect_positions(coords, &mut positions);
      return bbox_center(&positions).map_or(Position::Missing, Position::Found);
    }

    if coords.len() < 2 {
      return Position::Missing;
    }
    parse_position(coords).map_or(Position::Malformed, Position::Found)
  }
}

/// `[lon, lat, ...]` to a coordinate, if both are finite numbers.
#[allow(clippy::cast_possible_truncation)]
fn parse_position(array: &[Value]) -> Option<WGS84Coordinate> {
  let lon = array.first()?.as_f64()?;
  let lat = array.get(1)?.as_f64()?;
  (lon.is_finite() && lat.is_finite()).then(|| WGS84Coordinate::new(lat as f32, lon as f32))
}

fn collect_positions(values: &[Value], out: &mut Vec<WGS84Coordinate>) {
  for value in values {
    if let Some(array) = value.as_array() {
      if array.first().is_some_and(Value::is_array) {
        collect_positions(array, out);
      } else if let Some(coord) = parse_position(array) {
        out.push(coord);
      }
    }
  }
}

fn bbox_center(positions: &[WGS84Coordinate]) -> Option<WGS84Coordinate> {
  let first = positions.first()?;
  let (min, max) = positions.iter().fold((*first, *first), |(min, max), c| {
    (
      WGS84Coordinate::new(min.lat.min(c.lat), min.lon.min(c.lon)),
      WGS84Coordinate::new(max.lat.max(c.lat), max.lon.max(c.lon)),
    )
  });
  Some(WGS84Coordinate::new(
    f32::midpoint(min.lat, max.lat),
    f32::midpoint(min.lon, max.lon),
  ))
}

/// The first of `keys` holding a non-empty string or a number.
fn text(props: &Properties, keys: &[&str]) -> Option<String> {
  keys.iter().find_map(|key| match props.get(*key)? {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  })
}

/// Zero and non-finite values count as absent.
fn number(props: &Properties, keys: &[&str]) -> Option<f64> {
  keys.iter().find_map(|key| {
    let value = match props.get(*key)? {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse::<f64>().ok(),
      _ => None,
    }?;
    (value.is_finite() && value != 0.).then_some(value)
  })
}

fn skills(props: &Properties) -> Vec<String> {
  let from_source: Vec<String> = match props.get("SKILLS") {
    Some(Value::Array(items)) => items
      .iter()
      .filter_map(Value::as_str)
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(ToString::to_string)
      .collect(),
    Some(Value::String(s)) => s
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(ToString::to_string)
      .collect(),
    _ => Vec::new(),
  };
  if from_source.is_empty() {
    DEFAULT_SKILLS.iter().map(ToString::to_string).collect()
  } else {
    from_source
  }
}

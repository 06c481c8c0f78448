use std::path::PathBuf;

use dirs::home_dir;
use log::error;

use crate::map::coordinates::WGS84Coordinate;

const DEFAULT_DATA_SOURCE: &str = "data/Parks_25_12_04.geojson";

/// Salt Lake City. Initial map center and stand-in for missing positions.
pub const DEFAULT_CENTER: WGS84Coordinate = WGS84Coordinate {
  lat: 40.7608,
  lon: -111.891,
};

/// How markers are grouped on the map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
  /// Markers closer than this many screen pixels are grouped.
  pub max_cluster_radius: f32,
  /// From this zoom level on every marker is shown on its own.
  pub disable_clustering_at_zoom: u8,
  /// Clicking a cluster at the max zoom fans it out instead of zooming.
  pub spiderfy_on_max_zoom: bool,
}

impl Default for ClusterSettings {
  fn default() -> Self {
    Self {
      max_cluster_radius: 60.,
      disable_clustering_at_zoom: 17,
      spiderfy_on_max_zoom: true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapSettings {
  pub center: WGS84Coordinate,
  pub initial_zoom: u8,
  /// Screen pixels kept free around fitted bounds.
  pub fit_padding: f32,
  /// Zoom level used when a project is selected from the list.
  pub focus_zoom: u8,
  pub cluster: ClusterSettings,
}

impl Default for MapSettings {
  fn default() -> Self {
    Self {
      center: DEFAULT_CENTER,
      initial_zoom: 13,
      fit_padding: 50.,
      focus_zoom: 16,
      cluster: ClusterSettings::default(),
    }
  }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
  pub config_path: Option<PathBuf>,
  /// A http(s) url or a file path to a GeoJSON feature collection.
  pub data_source: Option<String>,
  pub map: Option<MapSettings>,
}

impl Config {
  /// Merges environment, config file and defaults, in that order of precedence.
  #[must_use]
  pub fn new() -> Self {
    let from_env = Self::from_env();
    let from_file = Self::from_file();
    let default = Self::default();

    let mut merged = from_env;
    if let Some(from_file) = &from_file {
      merged = merged.merge(from_file);
    }
    merged = merged.merge(&default);

    if merged.config_path.is_some() && from_file.is_none() {
      merged.init_cfg_file();
    }

    merged
  }

  fn from_env() -> Self {
    Self {
      config_path: std::env::var("PROJECTMAP_CONFIG").ok().map(PathBuf::from),
      data_source: std::env::var("PROJECTMAP_DATA").ok(),
      map: None,
    }
  }

  fn merge(mut self, other: &Self) -> Self {
    self.config_path = self.config_path.or(other.config_path.clone());
    self.data_source = self.data_source.or(other.data_source.clone());
    self.map = self.map.or(other.map.clone());
    self
  }

  fn from_file() -> Option<Self> {
    let config_path = std::env::var("PROJECTMAP_CONFIG")
      .ok()
      .map(PathBuf::from)
      .or_else(|| home_dir().map(|p| p.join(".config").join("projectmap")))?;
    Self::read_file(&config_path.join("config.json"))
  }

  fn read_file(path: &std::path::Path) -> Option<Self> {
    serde_json::from_str(&std::fs::read_to_string(path).ok()?)
      .inspect_err(|e| error!("Failed to read config file: {e}"))
      .ok()
  }

  fn init_cfg_file(&self) {
    let Some(path) = &self.config_path else {
      return;
    };
    if !path.exists() {
      let _ = std::fs::create_dir_all(path).inspect_err(|e| {
        error!("Failed to create config directory: {e}");
      });
    }

    let path = path.join("config.json");
    if !path.exists() {
      match serde_json::to_string_pretty(self) {
        Ok(config) => {
          let _ = std::fs::write(path, config).inspect_err(|e| {
            error!("Failed to write config file: {e}");
          });
        }
        Err(e) => error!("Failed to serialize config: {e}"),
      }
    }
  }

  #[must_use]
  pub fn data_source(&self) -> &str {
    self.data_source.as_deref().unwrap_or(DEFAULT_DATA_SOURCE)
  }

  #[must_use]
  pub fn map_settings(&self) -> MapSettings {
    self.map.clone().unwrap_or_default()
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      config_path: home_dir().map(|p| p.join(".config").join("projectmap")),
      data_source: Some(DEFAULT_DATA_SOURCE.to_string()),
      map: Some(MapSettings::default()),
    }
  }
}

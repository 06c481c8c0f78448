use std::{fmt::Display, path::PathBuf, time::Duration};

use log::{debug, error, info};
use serde_json::Value;
use surf::Config;
use thiserror::Error;

use crate::{
  map::coordinates::WGS84Coordinate,
  parser::GeoJsonNormalizer,
  project::{Category, ProjectRecord},
};

#[derive(Error, Debug)]
pub enum LoadError {
  #[error("Request to {url} failed: {reason}")]
  Request { url: String, reason: String },
  #[error("Request to {url} answered with status {status}")]
  Status { url: String, status: u16 },
  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Payload is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Invalid GeoJSON format: missing features array")]
  MissingFeatures,
}

/// Something that can deliver the raw project payload.
#[allow(async_fn_in_trait)]
pub trait ProjectSource {
  /// Human readable origin, used for logging.
  fn describe(&self) -> String;
  /// Fetches the payload text.
  async fn fetch(&self) -> Result<String, LoadError>;
}

/// Downloads the payload with a GET request.
#[derive(Debug, Clone)]
pub struct HttpSource {
  url: String,
  timeout: Duration,
}

impl HttpSource {
  #[must_use]
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      timeout: Duration::from_secs(10),
    }
  }

  fn request_error(&self, reason: impl Display) -> LoadError {
    LoadError::Request {
      url: self.url.clone(),
      reason: reason.to_string(),
    }
  }
}

impl ProjectSource for HttpSource {
  fn describe(&self) -> String {
    self.url.clone()
  }

  async fn fetch(&self) -> Result<String, LoadError> {
    let client: surf::Client = Config::new()
      .set_timeout(Some(self.timeout))
      .try_into()
      .map_err(|e| self.request_error(format!("{e:?}")))?;
    let mut response = client
      .get(&self.url)
      .await
      .map_err(|e| self.request_error(e))?;
    if !response.status().is_success() {
      return Err(LoadError::Status {
        url: self.url.clone(),
        status: response.status() as u16,
      });
    }
    response.body_string().await.map_err(|e| self.request_error(e))
  }
}

/// Reads the payload from the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
  path: PathBuf,
}

impl FileSource {
  #[must_use]
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl ProjectSource for FileSource {
  fn describe(&self) -> String {
    self.path.display().to_string()
  }

  async fn fetch(&self) -> Result<String, LoadError> {
    std::fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
      path: self.path.clone(),
      source,
    })
  }
}

/// A configured data source: urls are downloaded, everything else is a path.
#[derive(Debug, Clone)]
pub enum DataSource {
  Http(HttpSource),
  File(FileSource),
}

impl DataSource {
  #[must_use]
  pub fn parse(source: &str) -> Self {
    if source.starts_with("http://") || source.starts_with("https://") {
      DataSource::Http(HttpSource::new(source))
    } else {
      DataSource::File(FileSource::new(source))
    }
  }
}

impl ProjectSource for DataSource {
  fn describe(&self) -> String {
    match self {
      DataSource::Http(source) => source.describe(),
      DataSource::File(source) => source.describe(),
    }
  }

  async fn fetch(&self) -> Result<String, LoadError> {
    match self {
      DataSource::Http(source) => source.fetch().await,
      DataSource::File(source) => source.fetch().await,
    }
  }
}

/// Where the loaded projects came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
  Source(String),
  Demo,
}

/// A complete set of projects, ready to be handed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
  pub projects: Vec<ProjectRecord>,
  pub origin: DataOrigin,
}

impl Dataset {
  /// The built-in demonstration projects.
  #[must_use]
  pub fn demo() -> Self {
    Self {
      projects: demo_projects(),
      origin: DataOrigin::Demo,
    }
  }
}

/// Validates the top level of a feature collection and normalizes its features.
///
/// # Errors
/// If the text is not JSON or has no `features` array.
pub fn parse_payload(
  text: &str,
  normalizer: &GeoJsonNormalizer,
) -> Result<Vec<ProjectRecord>, LoadError> {
  let payload: Value = serde_json::from_str(text)?;
  let features = payload
    .get("features")
    .and_then(Value::as_array)
    .ok_or(LoadError::MissingFeatures)?;
  Ok(normalizer.normalize(features))
}

/// Loads the projects from `source`. Any failure is logged and answered with
/// the demonstration dataset, so this always yields something to show.
pub async fn load_dataset<S: ProjectSource>(source: &S, normalizer: &GeoJsonNormalizer) -> Dataset {
  debug!("Loading projects from {}", source.describe());
  let loaded = match source.fetch().await {
    Ok(text) => parse_payload(&text, normalizer),
    Err(e) => Err(e),
  };
  match loaded {
    Ok(projects) => {
      info!("Successfully loaded {} projects!", projects.len());
      Dataset {
        projects,
        origin: DataOrigin::Source(source.describe()),
      }
    }
    Err(e) => {
      error!("Error loading projects from {}: {e}", source.describe());
      info!("Loading sample projects for demonstration...");
      Dataset::demo()
    }
  }
}

#[must_use]
pub fn demo_projects() -> Vec<ProjectRecord> {
  vec![
    ProjectRecord::new("1", "Downtown Park Redevelopment")
      .with_location(WGS84Coordinate::new(40.7608, -111.891))
      .with_category(Category::Parks)
      .with_year("2024")
      .with_status("ongoing")
      .with_description(
        "Complete redesign of downtown park focusing on accessibility and sustainability.",
      )
      .with_size_metric(12.5)
      .with_client("City Parks Department")
      .with_skills([
        "Public Engagement",
        "Accessibility Design",
        "Sustainable Materials",
      ]),
    ProjectRecord::new("2", "Transit Corridor Analysis")
      .with_location(WGS84Coordinate::new(40.75, -111.9))
      .with_category(Category::Transportation)
      .with_year("2023")
      .with_status("completed")
      .with_description(
        "GIS analysis of bus rapid transit corridors for improved public transportation.",
      )
      .with_client("Regional Transportation Authority")
      .with_skills(["Network Analysis", "Demographic Data", "Traffic Modeling"]),
  ]
}

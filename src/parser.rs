/// Normalizes `GeoJSON` features into project records.
mod geojson;
pub use geojson::GeoJsonNormalizer;

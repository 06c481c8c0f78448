/// Marker grouping and the map view state.
pub mod cluster_layer;
/// Contains everything needed to handle coordinates.
pub mod coordinates;
/// The map widget.
pub mod marker_canvas;

pub mod config;
pub mod controller;
pub mod filter;
pub mod list;
pub mod loader;
pub mod map;
pub mod parser;
pub mod project;
pub mod projectmap_ui;
pub mod render;
pub mod selection;

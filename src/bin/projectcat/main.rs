use anyhow::Result;
use clap::Parser as _;
use log::warn;
use projectmap::{
  config::Config,
  filter::{FilterSelection, WILDCARD, filter_projects},
  loader::{DataOrigin, DataSource, load_dataset},
  parser::GeoJsonNormalizer,
  project::ProjectRecord,
};

/// Prints the projects of a GeoJSON source, optionally filtered.
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// A GeoJSON file or http(s) url. Defaults to the configured data source.
  #[arg(short, long)]
  data: Option<String>,

  /// Only projects of this year.
  #[arg(short, long, default_value = WILDCARD)]
  year: String,

  /// Only projects of this category: parks, transportation, zoning, environmental, default.
  #[arg(short, long, default_value = WILDCARD)]
  category: String,

  /// Only projects with this status.
  #[arg(short, long, default_value = WILDCARD)]
  status: String,

  /// Prints the normalized records as JSON instead of a table.
  #[arg(short, long)]
  json: bool,
}

fn print_table(projects: &[&ProjectRecord]) {
  for project in projects {
    let location = project.valid_location().map_or_else(
      || "-".to_string(),
      |l| format!("{:.5},{:.5}", l.lat, l.lon),
    );
    println!(
      "{:>6}  {:<14}  {:<6}  {:<10}  {:<22}  {}",
      project.id.as_str(),
      project.category.name(),
      project.year,
      project.status,
      location,
      project.title
    );
  }
  println!("{} projects", projects.len());
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  env_logger::init();

  let config = Config::new();
  let source = DataSource::parse(args.data.as_deref().unwrap_or(config.data_source()));
  let normalizer = GeoJsonNormalizer::new(config.map_settings().center);

  let selection = FilterSelection::from_controls(&args.year, &args.category, &args.status)?;
  let dataset = load_dataset(&source, &normalizer).await;
  if dataset.origin == DataOrigin::Demo {
    warn!("Showing the sample projects instead");
  }
  let visible = filter_projects(&dataset.projects, &selection);

  if args.json {
    println!("{}", serde_json::to_string_pretty(&visible)?);
  } else {
    print_table(&visible);
  }
  Ok(())
}

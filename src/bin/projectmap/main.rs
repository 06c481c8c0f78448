use clap::Parser as _;
use projectmap::{
  config::Config,
  loader::DataSource,
  parser::GeoJsonNormalizer,
  projectmap_ui::{ProjectMapApp, spawn_loader},
};

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// A GeoJSON file or http(s) url. Overrides the configured data source.
  #[arg(short, long)]
  data: Option<String>,

  /// Initial year filter.
  #[arg(long, default_value = "all")]
  year: String,

  /// Initial category filter.
  #[arg(long, default_value = "all")]
  category: String,

  /// Initial status filter.
  #[arg(long, default_value = "all")]
  status: String,
}

fn main() -> eframe::Result {
  let args = Args::parse();

  // init logger.
  env_logger::init();

  // Tokio runtime, handed to the loader thread.
  let rt = tokio::runtime::Runtime::new().expect("tokio runtime");

  let config = Config::new();
  let settings = config.map_settings();
  let source = DataSource::parse(args.data.as_deref().unwrap_or(config.data_source()));
  let normalizer = GeoJsonNormalizer::new(settings.center);

  let options = eframe::NativeOptions {
    viewport: egui::ViewportBuilder {
      inner_size: Some(egui::vec2(1400.0, 900.0)),
      clamp_size_to_monitor_size: Some(true),
      ..Default::default()
    },
    ..Default::default()
  };

  eframe::run_native(
    "projectmap",
    options,
    Box::new(move |cc| {
      let datasets = spawn_loader(rt, source, normalizer, cc.egui_ctx.clone());
      Ok(Box::new(
        ProjectMapApp::new(settings, datasets).with_filters(&args.year, &args.category, &args.status),
      ))
    }),
  )
}

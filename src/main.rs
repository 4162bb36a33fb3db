use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use geostamp::app::GeostampApp;
use geostamp::config::{load_settings, settings_path};
use geostamp::coord::Datum;
use geostamp::fs_utils::{expand_paths, ScanOptions};
use geostamp::geotag::ExifGeoMetadata;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pick a point on a map and write it into the GPS tags of many images"
)]
struct Args {
    /// Images or directories to load on start-up
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Recurse into subdirectories of the given directories
    #[arg(short = 'r', long = "recursive", default_value_t = false)]
    recursive: bool,

    /// Glob of files to skip (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Datum of coordinates on the map; files always store WGS84
    #[arg(short, long, value_enum)]
    datum: Option<Datum>,

    /// Number of parallel thumbnail decoding threads
    #[arg(short = 'j', long = "parallel", default_value_t = 4)]
    parallel: usize,

    /// Settings file to use instead of the per-user one
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.config.clone().unwrap_or_else(settings_path);
    let mut settings = load_settings(&config)?;
    if args.recursive {
        settings.recursive = true;
    }
    settings.exclude.extend(args.exclude.iter().cloned());
    if let Some(datum) = args.datum {
        settings.datum = datum;
    }
    tracing::debug!(?settings, "settings from {}", config.display());

    let scan = ScanOptions::new(settings.recursive, &settings.exclude)?;
    let files = expand_paths(&args.paths, &scan)?;
    if !args.paths.is_empty() && files.is_empty() {
        tracing::warn!("no supported images found in the given paths");
    }

    let metadata = Arc::new(ExifGeoMetadata::new(settings.datum));
    let parallel = args.parallel;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "geostamp",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(GeostampApp::new(
                &cc.egui_ctx,
                settings,
                scan,
                metadata,
                files,
                parallel,
            )))
        }),
    )?;

    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc;

mod columns;
mod controller;
mod datasource;
mod domain;
mod enrich;
mod export;
mod inputter;
mod model;
mod record;
mod ui;

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use controller::Controller;
use domain::{RosterConfig, RosterError};
use export::GenpdfRenderer;
use model::{Model, Status};
use record::JsonFileLoader;

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "A tui staff roster viewer")]
struct Args {
    /// Staff records file (JSON array of users)
    #[arg(default_value = "tests/fixtures/users.json")]
    data: String,

    /// Rows per table page
    #[arg(short, long, default_value_t = 10)]
    page_size: usize,

    /// Seed for the salary/detail enrichment, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the export font family
    #[arg(long, default_value = "/usr/share/fonts/truetype/liberation")]
    font_dir: String,

    /// Font family name used by the PDF export
    #[arg(long, default_value = "LiberationSans")]
    font_name: String,

    /// Log file, filtered via RUST_LOG
    #[arg(long, default_value = "roster.log")]
    log_file: String,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

// The terminal belongs to the UI, so logs go to a file.
fn init_tracing(path: &str) -> Result<(), RosterError> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run() -> Result<(), RosterError> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let data_path = shellexpand::full(&args.data)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .unwrap_or_else(|_| PathBuf::from(&args.data));

    let config = RosterConfig::default()
        .with_data_path(data_path)
        .with_page_size(args.page_size)
        .with_seed(args.seed)
        .with_font_dir(args.font_dir.into())
        .with_font_name(args.font_name);
    info!("Starting roster with {:?}", config);

    let renderer = GenpdfRenderer::new(config.font_dir.clone(), config.font_name.clone());
    let mut model = Model::init(config.clone(), Box::new(renderer));
    let controller = Controller::new(&config);

    // The record collaborator reports back over this channel; once the loop
    // below ends the receiver is gone and late emissions are dropped.
    let (tx, rx) = mpsc::channel();
    record::spawn_fetch(JsonFileLoader::new(config.data_path.clone()), tx);

    let mut terminal = ratatui::init();

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui::draw(&model, f))?;

        // Drain loader emissions, then map user events to a Message
        while let Ok(message) = rx.try_recv() {
            model.update(message);
        }
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message);
        }
    }

    Ok(())
}

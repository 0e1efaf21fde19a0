use clap::Parser;
use lectern::core::config;
use lectern::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lectern", about = "Terminal reader for Bibles, commentaries and books")]
struct Args {
    /// Document to open when no saved position exists (e.g. KJV)
    #[arg(short, long)]
    document: Option<String>,

    /// Directory for saved reading position
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to lectern.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("lectern.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        config::LecternConfig::default()
    });
    let resolved = config::resolve(&file_config, args.document.as_deref(), args.state_dir.as_deref());

    log::info!(
        "Lectern starting up with document {} (state dir: {:?})",
        resolved.start_document,
        resolved.state_dir
    );

    tui::run(resolved)
}

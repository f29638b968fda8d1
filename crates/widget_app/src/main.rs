//! Terminal front end for the upload widget.
//!
//! Each file argument is one pick in the file chooser: it is sent to the
//! processing service and the returned image is saved to the output directory.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use terminal::config::{self, WidgetConfig};
use terminal::logging::{self, LogDestination};

/// Upload videos or images to the processing service and save the results.
#[derive(Parser)]
#[command(name = "widget_app", version)]
struct Cli {
    /// Files to upload, one after another.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Base URL of the processing service.
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory processed images are saved to.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Filename for the saved image.
    #[arg(long)]
    download_name: Option<String>,

    /// RON configuration file.
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Keep results in memory only.
    #[arg(long)]
    no_download: bool,

    /// Also write logs to ./upload_widget.log.
    #[arg(long)]
    log_file: bool,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, cli.verbose);

    let config = apply_overrides(config::load_or_default(&cli.config), &cli);
    match terminal::run(config, &cli.files, !cli.no_download) {
        Ok(summary) => {
            println!(
                "{} uploaded, {} failed, {} skipped",
                summary.succeeded, summary.failed, summary.skipped
            );
            for path in &summary.downloads {
                println!("saved {}", path.display());
            }
            if summary.failed_downloads > 0 {
                println!("{} downloads could not be saved", summary.failed_downloads);
            }
            if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(mut config: WidgetConfig, cli: &Cli) -> WidgetConfig {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(name) = &cli.download_name {
        config.download_filename = name.clone();
    }
    config
}

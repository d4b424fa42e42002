//! ImageShow - open images in ImageJ, Fiji or another external viewer
//!
//! Main entry point for the command-line tool.

use anyhow::{Context, Result};
use clap::Parser;
use show_core::{is_color_image, ImageViewer, SystemLauncher, ViewerConfig};
use show_log::LogOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgshow", version, about = "Show an image in an external viewer")]
struct Cli {
    /// Image file to show
    image: PathBuf,

    /// Window title (defaults to the temporary file path)
    #[arg(short, long, default_value = "")]
    title: String,

    /// Command template: %a application, %f file, %t title, %% percent
    #[arg(short, long)]
    command: Option<String>,

    /// Viewer application, skipping discovery
    #[arg(short, long)]
    app: Option<PathBuf>,

    /// Temporary file extension, e.g. ".tif"
    #[arg(short, long)]
    extension: Option<String>,

    /// Wait for the viewer to exit
    #[arg(short, long)]
    wait: bool,

    /// Print the argument vector instead of launching
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging so its debug flag picks the level
    let (mut config, config_error) = ViewerConfig::load();

    let _log_guard = show_log::init(LogOptions {
        debug: cli.debug || config.debug,
        console: true,
    })?;

    if let Some(e) = config_error {
        tracing::warn!(
            "Ignoring unreadable configuration {:?}: {:#}",
            ViewerConfig::config_path(),
            e
        );
    }
    tracing::debug!("Effective configuration: {:?}", config);

    if let Err(e) = show_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    apply_cli(&mut config, &cli);
    let mut viewer = ImageViewer::new(config);
    viewer.set_title(cli.title.as_str());
    if let Some(command) = &cli.command {
        viewer.set_command(command.as_str());
    }

    let image = image::open(&cli.image)
        .with_context(|| format!("Failed to read image {}", cli.image.display()))?;

    if cli.dry_run {
        let file = cli.image.display().to_string();
        let argv = viewer
            .build_command(&file, is_color_image(&image))
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        for arg in argv {
            println!("{}", arg);
        }
        return Ok(());
    }

    let outcome = viewer
        .show(&image, &SystemLauncher)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    tracing::info!("Showing {} via {:?}", outcome.file.display(), outcome.argv);

    Ok(())
}

/// Fold command-line overrides into the loaded configuration
fn apply_cli(config: &mut ViewerConfig, cli: &Cli) {
    if let Some(app) = &cli.app {
        config.application = Some(app.clone());
    }
    if let Some(extension) = &cli.extension {
        config.file_extension = extension.clone();
    }
    if cli.wait {
        config.wait_for_exit = true;
    }
}

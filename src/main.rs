mod cli;
mod config;
mod data;
mod error;
mod figures;
mod folder_structure;
mod plots;
mod transform;

use clap::Parser;
use config::PlotSuiteConfig;
use figures::Figure;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // stdout only carries the saved paths
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut suite_config = PlotSuiteConfig::load(args.config_file.as_deref())?;
    if let Some(output_folder) = args.output_folder {
        suite_config.output_folder = output_folder;
    }

    let plot_folder = suite_config.setup()?;
    info!(folder = %plot_folder.get().display(), "writing figures");

    let figures = if args.figures.is_empty() {
        Figure::iter().collect()
    } else {
        args.figures
    };

    let saved = figures::render_figures(figures, &suite_config, &plot_folder)?;
    info!("saved {} image(s)", saved.len());

    Ok(())
}

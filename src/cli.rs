use clap::Parser;
use std::path::PathBuf;

use crate::figures::Figure;

#[derive(Parser)]
#[command(about = "Renders the KV cache compression benchmark figures")]
pub struct Args {
    /// TOML file with output settings. `plot_config.toml` is read if it exists.
    pub config_file: Option<PathBuf>,

    /// Figures to render. All figures if omitted.
    #[arg(short, long = "figure", value_enum)]
    pub figures: Vec<Figure>,

    /// Overrides the output folder of the config file.
    #[arg(short, long)]
    pub output_folder: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

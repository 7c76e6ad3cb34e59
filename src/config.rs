use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::folder_structure::PlotFolder;

pub static DEFAULT_CONFIG_FILE: &str = "plot_config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

// output settings read from a file. the plotted data itself lives in the
// figure modules and is changed by editing them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSuiteConfig {
    pub output_folder: PathBuf,
    /// Overrides the dpi every figure brings along.
    pub dpi: Option<u32>,
    pub formats: Vec<OutputFormat>,
    /// Put every run into its own timestamped subfolder.
    pub timestamped_runs: bool,
}

impl Default for PlotSuiteConfig {
    fn default() -> Self {
        Self {
            output_folder: PathBuf::from("plots"),
            dpi: None,
            formats: vec![OutputFormat::Png],
            timestamped_runs: false,
        }
    }
}

impl PlotSuiteConfig {
    /// Reads `config_file`, or the default config file if it exists. Without either,
    /// the defaults are used.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let path = match config_file {
            Some(path) => path,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if !default_path.exists() {
                    info!("no {DEFAULT_CONFIG_FILE} found, using default settings");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let config_file_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config = Self::from_toml(&config_file_str)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        debug!(?config, "loaded config");

        Ok(config)
    }

    pub fn from_toml(config_file_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(config_file_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dpi == Some(0) {
            bail!("dpi must be positive");
        }
        if self.formats.is_empty() {
            bail!("at least one output format is required");
        }
        Ok(())
    }

    pub fn plot_folder(&self) -> PlotFolder {
        PlotFolder::new(&self.output_folder, self.timestamped_runs)
    }

    pub fn setup(&self) -> Result<PlotFolder> {
        let plot_folder = self.plot_folder();
        if !plot_folder.get().exists() {
            fs::create_dir_all(plot_folder.get()).with_context(|| {
                format!(
                    "failed to create output folder {}",
                    plot_folder.get().display()
                )
            })?;
        }

        Ok(plot_folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(
            PlotSuiteConfig::from_toml("").unwrap(),
            PlotSuiteConfig::default()
        );
    }

    #[test]
    fn reads_all_fields() {
        let config = PlotSuiteConfig::from_toml(
            r#"
            output_folder = "figures"
            dpi = 300
            formats = ["png", "svg"]
            timestamped_runs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.output_folder, PathBuf::from("figures"));
        assert_eq!(config.dpi, Some(300));
        assert_eq!(config.formats, vec![OutputFormat::Png, OutputFormat::Svg]);
        assert!(config.timestamped_runs);
    }

    #[test]
    fn rejects_unknown_format_and_fields() {
        assert!(PlotSuiteConfig::from_toml(r#"formats = ["pdf"]"#).is_err());
        assert!(PlotSuiteConfig::from_toml("figsize = 3").is_err());
    }

    #[test]
    fn rejects_zero_dpi_and_no_formats() {
        assert!(PlotSuiteConfig::from_toml("dpi = 0").is_err());
        assert!(PlotSuiteConfig::from_toml("formats = []").is_err());
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(PlotSuiteConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn setup_creates_output_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlotSuiteConfig {
            output_folder: dir.path().join("nested").join("plots"),
            ..Default::default()
        };

        let folder = config.setup().unwrap();
        assert!(folder.get().is_dir());
    }
}

mod chunk_size;
mod iterative_ruler;
mod needle_recall;
mod reconstruction;
mod ruler_16k;
mod ruler_methods;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use strum::{Display, EnumIter};
use tracing::{error, info};

use crate::{
    config::PlotSuiteConfig,
    error::DataResult,
    folder_structure::PlotFolder,
    plots::{self, FigurePlan},
};

#[derive(Debug, Clone, Copy, EnumIter, ValueEnum, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum Figure {
    #[value(name = "ruler-16k")]
    #[strum(serialize = "ruler-16k")]
    Ruler16k,
    RulerMethods,
    Reconstruction,
    IterativeRuler,
    NeedleRecall,
    ChunkSize,
}

impl Figure {
    /// Validates the recorded results and lays out every image of this figure.
    pub fn build(&self) -> DataResult<Vec<FigurePlan>> {
        match *self {
            Figure::Ruler16k => ruler_16k::build(),
            Figure::RulerMethods => ruler_methods::build(),
            Figure::Reconstruction => reconstruction::build(),
            Figure::IterativeRuler => iterative_ruler::build(),
            Figure::NeedleRecall => needle_recall::build(),
            Figure::ChunkSize => chunk_size::build(),
        }
    }

    pub fn render(
        &self,
        suite_config: &PlotSuiteConfig,
        plot_folder: &PlotFolder,
    ) -> Result<Vec<PathBuf>> {
        render_plans(&self.to_string(), self.build(), suite_config, plot_folder)
    }
}

/// Saves the images of one figure. Nothing is written unless every plan was
/// built, so bad data never leaves a partial set of images behind.
pub fn render_plans(
    figure: &str,
    plans: DataResult<Vec<FigurePlan>>,
    suite_config: &PlotSuiteConfig,
    plot_folder: &PlotFolder,
) -> Result<Vec<PathBuf>> {
    let plans = plans.with_context(|| format!("invalid data for figure {figure}"))?;

    let mut saved = Vec::new();
    for mut plan in plans {
        if let Some(dpi) = suite_config.dpi {
            plan.size = plan.size.with_dpi(dpi);
        }
        saved.extend(plots::save_figure(&plan, plot_folder, &suite_config.formats)?);
    }

    Ok(saved)
}

pub fn render_figures<I: IntoIterator<Item = Figure>>(
    figures: I,
    suite_config: &PlotSuiteConfig,
    plot_folder: &PlotFolder,
) -> Result<Vec<PathBuf>> {
    let mut num_error_figures = 0;
    let mut saved = Vec::new();

    for figure in figures.into_iter() {
        info!(%figure, "rendering");

        match figure.render(suite_config, plot_folder) {
            Ok(paths) => saved.extend(paths),
            Err(err) => {
                error!(%figure, "{err:#}");
                num_error_figures += 1;
            }
        }
    }

    if num_error_figures != 0 {
        bail!("errors occurred in {num_error_figures} figure(s)")
    }

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{data::RecallSource, error::DataError};
    use strum::IntoEnumIterator;

    #[test]
    fn every_figure_builds_from_its_recorded_data() {
        for figure in Figure::iter() {
            let plans = figure.build().unwrap();
            assert!(!plans.is_empty(), "{figure} has no images");
        }
    }

    #[test]
    fn image_names_are_unique_across_figures() {
        let mut names = HashSet::new();
        for figure in Figure::iter() {
            for plan in figure.build().unwrap() {
                assert!(names.insert(plan.name.clone()), "{} twice", plan.name);
            }
        }
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn display_matches_cli_names() {
        for figure in Figure::iter() {
            let value = figure.to_possible_value().unwrap();
            assert_eq!(value.get_name(), figure.to_string());
        }
    }

    #[test]
    fn out_of_range_recall_writes_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let suite_config = PlotSuiteConfig {
            output_folder: dir.path().to_path_buf(),
            dpi: Some(50),
            ..Default::default()
        };
        let plot_folder = suite_config.setup().unwrap();

        let good = RecallSource::complete("good", [("len_10", [1.0, 0.5])]);
        let bad = RecallSource::complete("bad", [("len_10", [1.2, 0.5])]);
        let plans = [
            needle_recall::plan("needle_good", &[good], &[10], &[15, 95]),
            needle_recall::plan("needle_bad", &[bad], &[10], &[15, 95]),
        ]
        .into_iter()
        .collect::<DataResult<Vec<_>>>();

        let err = render_plans("needle-recall", plans, &suite_config, &plot_folder).unwrap_err();
        assert_eq!(err.to_string(), "invalid data for figure needle-recall");
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::OutOfRange { index: 0, .. })
        ));

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

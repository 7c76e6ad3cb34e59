pub mod bar;
pub mod colormap;
pub mod heatmap;
pub mod line;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use charming::{
    component::{Axis, Legend, Title},
    element::{
        AxisLabel, AxisType, Formatter, ItemStyle, LineStyle, LineStyleType, NameLocation, Symbol,
        TextStyle,
    },
    series::Line,
    Chart, ImageFormat, ImageRenderer,
};
use tracing::debug;

use crate::{config::OutputFormat, folder_structure::PlotFolder};

use self::{bar::BarChart, heatmap::HeatmapGrid, line::LineChart};

// font sizes are in points and get scaled with the dpi of the figure
const TITLE_FONT_SIZE: f64 = 14.0;
const AXIS_NAME_FONT_SIZE: f64 = 12.0;
const TICK_FONT_SIZE: f64 = 10.0;
const LEGEND_FONT_SIZE: f64 = 10.0;

const LINE_WIDTH: f64 = 2.0;
const REFERENCE_LINE_WIDTH: f64 = 1.5;
const MARKER_SIZE: f64 = 8.0;

static DEFAULT_COLOR: &str = "#000000";

/// Physical size of a figure. Pixel size and font sizes follow from the dpi.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_inches: f64,
    pub height_inches: f64,
    pub dpi: u32,
}

impl FigureSize {
    pub const fn new(width_inches: f64, height_inches: f64, dpi: u32) -> Self {
        Self {
            width_inches,
            height_inches,
            dpi,
        }
    }

    pub fn with_dpi(self, dpi: u32) -> Self {
        Self { dpi, ..self }
    }

    pub fn pixels(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_inches * dpi).round() as u32,
            (self.height_inches * dpi).round() as u32,
        )
    }

    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    fn font_px(&self, points: f64) -> i32 {
        self.points_to_pixels(points).round() as i32
    }
}

/// Method name -> display color. Unknown names are drawn black.
#[derive(Debug, Clone, Copy)]
pub struct Palette(pub &'static [(&'static str, &'static str)]);

impl Palette {
    pub fn color_for(&self, name: &str) -> &'static str {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(DEFAULT_COLOR, |(_, color)| color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    Dashed,
    Dotted,
}

impl From<Stroke> for LineStyleType {
    fn from(value: Stroke) -> Self {
        match value {
            Stroke::Solid => LineStyleType::Solid,
            Stroke::Dashed => LineStyleType::Dashed,
            Stroke::Dotted => LineStyleType::Dotted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// A polyline with markers. On category axes, x is the category index.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    pub name: String,
    pub color: String,
    pub stroke: Stroke,
    pub points: Vec<(f64, f64)>,
}

impl LinePlot {
    pub fn new<S: Into<String>>(
        name: S,
        color: &str,
        stroke: Stroke,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.to_owned(),
            stroke,
            points,
        }
    }
}

/// Horizontal dashed line across the whole x range, e.g. the uncompressed score.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub name: Option<String>,
    pub y: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Line(LineChart),
    Bar(BarChart),
    Heatmap(HeatmapGrid),
}

/// Everything needed to write one image, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct FigurePlan {
    pub name: String,
    pub size: FigureSize,
    pub plan: Plan,
}

impl FigurePlan {
    pub fn new<S: Into<String>>(name: S, size: FigureSize, plan: Plan) -> Self {
        Self {
            name: name.into(),
            size,
            plan,
        }
    }

    pub fn to_chart(&self) -> Chart {
        match &self.plan {
            Plan::Line(chart) => chart.to_chart(&self.size),
            Plan::Bar(chart) => chart.to_chart(&self.size),
            Plan::Heatmap(grid) => grid.to_chart(&self.size),
        }
    }
}

pub fn save_figure(
    figure: &FigurePlan,
    folder: &PlotFolder,
    formats: &[OutputFormat],
) -> Result<Vec<PathBuf>> {
    let chart = figure.to_chart();
    let (width, height) = figure.size.pixels();
    let mut renderer = ImageRenderer::new(width, height);

    let mut saved = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = folder.image_path(&figure.name, format);
        debug!(path = %path.display(), width, height, "rendering figure");

        match format {
            OutputFormat::Png => renderer.save_format(ImageFormat::Png, &chart, &path),
            OutputFormat::Svg => renderer.save(&chart, &path),
        }
        .map_err(|err| anyhow!("failed to save plot to {}: {err:?}", path.display()))?;

        println!("Saved plot to: {}", path.display());
        saved.push(path);
    }

    Ok(saved)
}

fn base_chart(title: &str, size: &FigureSize) -> Chart {
    Chart::new()
        .background_color("white")
        .title(
            Title::new().text(title).left("center").text_style(
                TextStyle::new()
                    .font_size(size.font_px(TITLE_FONT_SIZE))
                    .color("black"),
            ),
        )
}

fn legend(size: &FigureSize) -> Legend {
    Legend::new().top("8%").text_style(
        TextStyle::new()
            .font_size(size.font_px(LEGEND_FONT_SIZE))
            .color("black"),
    )
}

fn axis_name_style(size: &FigureSize) -> TextStyle {
    TextStyle::new()
        .font_size(size.font_px(AXIS_NAME_FONT_SIZE))
        .color("black")
}

fn tick_labels(size: &FigureSize) -> AxisLabel {
    AxisLabel::new()
        .font_size(size.font_px(TICK_FONT_SIZE))
        .color("black")
}

fn category_axis(name: &str, categories: &[String], size: &FigureSize) -> Axis {
    Axis::new()
        .type_(AxisType::Category)
        .data(categories.to_vec())
        .name(name)
        .name_location(NameLocation::Middle)
        .name_gap(size.font_px(AXIS_NAME_FONT_SIZE) * 2)
        .name_text_style(axis_name_style(size))
        .axis_label(tick_labels(size))
}

fn value_axis(name: &str, range: AxisRange, size: &FigureSize) -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .min(range.min)
        .max(range.max)
        .name(name)
        .name_location(NameLocation::Middle)
        .name_gap(size.font_px(AXIS_NAME_FONT_SIZE) * 3)
        .name_text_style(axis_name_style(size))
        .axis_label(tick_labels(size))
}

fn percent_labels(size: &FigureSize) -> AxisLabel {
    tick_labels(size).formatter(Formatter::String("{value}%".into()))
}

fn line_series(plot: &LinePlot, size: &FigureSize) -> Line {
    Line::new()
        .name(plot.name.as_str())
        .data(
            plot.points
                .iter()
                .map(|&(x, y)| vec![x, y])
                .collect::<Vec<_>>(),
        )
        .symbol(Symbol::Circle)
        .symbol_size(size.points_to_pixels(MARKER_SIZE))
        .item_style(ItemStyle::new().color(plot.color.as_str()))
        .line_style(
            LineStyle::new()
                .color(plot.color.as_str())
                .width(size.points_to_pixels(LINE_WIDTH))
                .type_(LineStyleType::from(plot.stroke)),
        )
}

fn reference_series(reference: &ReferenceLine, x_span: (f64, f64), size: &FigureSize) -> Line {
    let mut line = Line::new()
        .data(vec![vec![x_span.0, reference.y], vec![x_span.1, reference.y]])
        .symbol(Symbol::None)
        .item_style(ItemStyle::new().color(reference.color.as_str()))
        .line_style(
            LineStyle::new()
                .color(reference.color.as_str())
                .width(size.points_to_pixels(REFERENCE_LINE_WIDTH))
                .type_(LineStyleType::Dashed),
        );

    if let Some(name) = &reference.name {
        line = line.name(name.as_str());
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_follows_dpi() {
        let size = FigureSize::new(10.0, 6.0, 150);
        assert_eq!(size.pixels(), (1500, 900));
        assert_eq!(size.with_dpi(300).pixels(), (3000, 1800));
    }

    #[test]
    fn fonts_scale_with_dpi() {
        let size = FigureSize::new(10.0, 6.0, 144);
        assert_eq!(size.font_px(12.0), 24);
    }

    #[test]
    fn unknown_method_is_drawn_black() {
        let palette = Palette(&[("KVzip", "#E74C3C")]);
        assert_eq!(palette.color_for("KVzip"), "#E74C3C");
        assert_eq!(palette.color_for("SnapKV"), "#000000");
    }
}

use charming::{
    component::Grid,
    element::{Formatter, ItemStyle, Label, LabelPosition, Symbol},
    series::{Bar, Line},
    Chart,
};

use super::{
    base_chart, category_axis, legend, line_series, reference_series, value_axis, AxisRange,
    FigureSize, LinePlot, ReferenceLine, Stroke,
};
use crate::{
    data::CategorySeries,
    transform::{split_oom, stack_layers, trend_points},
};

const BAR_EDGE_WIDTH: f64 = 1.5;
const ANNOTATION_FONT_SIZE: f64 = 7.0;

static OOM_TEXT: &str = "OOM";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarStyle {
    pub fill: &'static str,
    pub edge: &'static str,
    /// Height at which an OOM entry of this series is annotated.
    pub oom_label_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub fill: String,
    pub edge: String,
    pub stack: Option<String>,
    pub heights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub category: usize,
    pub y: f64,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub y_range: AxisRange,
    pub bars: Vec<BarSeries>,
    pub annotations: Vec<Annotation>,
    pub lines: Vec<LinePlot>,
    pub reference: Option<ReferenceLine>,
}

impl BarChart {
    pub fn new(
        title: &str,
        x_label: &str,
        y_label: &str,
        categories: &[String],
        y_range: AxisRange,
    ) -> Self {
        Self {
            title: title.to_owned(),
            x_label: x_label.to_owned(),
            y_label: y_label.to_owned(),
            categories: categories.to_vec(),
            y_range,
            bars: Vec::new(),
            annotations: Vec::new(),
            lines: Vec::new(),
            reference: None,
        }
    }

    /// A bar per category, OOM entries drawn flat and labelled, plus a trend line.
    pub fn push_standalone(&mut self, series: &CategorySeries, style: BarStyle) {
        let split = split_oom(&series.values);

        self.bars.push(BarSeries {
            name: series.name.clone(),
            fill: style.fill.to_owned(),
            edge: style.edge.to_owned(),
            stack: None,
            heights: split.heights,
        });
        self.annotate_oom(&split.oom_indices, style);
        self.push_trend(series, style);
    }

    /// `base` with `layers` stacked on top, each layer only adding what exceeds
    /// the layers below. `styles` holds the base style first, then one per layer.
    pub fn push_stack(
        &mut self,
        stack_id: &str,
        base: &CategorySeries,
        layers: &[CategorySeries],
        styles: &[BarStyle],
    ) {
        let segments = stack_layers(base, layers);
        let all_series = std::iter::once(base).chain(layers);

        for ((segment, series), &style) in segments.into_iter().zip(all_series).zip(styles) {
            self.bars.push(BarSeries {
                name: segment.name,
                fill: style.fill.to_owned(),
                edge: style.edge.to_owned(),
                stack: Some(stack_id.to_owned()),
                heights: segment.heights,
            });

            let oom_indices = split_oom(&series.values).oom_indices;
            self.annotate_oom(&oom_indices, style);
            self.push_trend(series, style);
        }
    }

    pub fn with_reference(mut self, y: f64, color: &str) -> Self {
        self.reference = Some(ReferenceLine {
            name: None,
            y,
            color: color.to_owned(),
        });
        self
    }

    fn annotate_oom(&mut self, oom_indices: &[usize], style: BarStyle) {
        self.annotations
            .extend(oom_indices.iter().map(|&category| Annotation {
                category,
                y: style.oom_label_y,
                text: OOM_TEXT.to_owned(),
                color: style.edge.to_owned(),
            }));
    }

    fn push_trend(&mut self, series: &CategorySeries, style: BarStyle) {
        let points = trend_points(&series.values);
        if !points.is_empty() {
            self.lines
                .push(LinePlot::new(&series.name, style.edge, Stroke::Solid, points));
        }
    }

    pub fn to_chart(&self, size: &FigureSize) -> Chart {
        let mut chart = base_chart(&self.title, size)
            .legend(legend(size))
            .grid(Grid::new().top("18%").left("8%").right("4%").bottom("12%"))
            .x_axis(category_axis(&self.x_label, &self.categories, size))
            .y_axis(value_axis(&self.y_label, self.y_range, size));

        for bar in &self.bars {
            let mut series = Bar::new()
                .name(bar.name.as_str())
                .data(bar.heights.clone())
                .item_style(
                    ItemStyle::new()
                        .color(bar.fill.as_str())
                        .border_color(bar.edge.as_str())
                        .border_width(size.points_to_pixels(BAR_EDGE_WIDTH)),
                );
            if let Some(stack) = &bar.stack {
                series = series.stack(stack.as_str());
            }
            chart = chart.series(series);
        }

        for line in &self.lines {
            chart = chart.series(line_series(line, size));
        }

        for annotation in &self.annotations {
            chart = chart.series(annotation_series(annotation, size));
        }

        if let Some(reference) = &self.reference {
            let span = (0.0, self.categories.len().saturating_sub(1) as f64);
            chart = chart.series(reference_series(reference, span, size));
        }

        chart
    }
}

// a single zero-sized point on a line series that only carries its text label
fn annotation_series(annotation: &Annotation, size: &FigureSize) -> Line {
    Line::new()
        .symbol(Symbol::Circle)
        .symbol_size(0.0)
        .data(vec![vec![annotation.category as f64, annotation.y]])
        .label(
            Label::new()
                .show(true)
                .position(LabelPosition::Inside)
                .font_size(size.font_px(ANNOTATION_FONT_SIZE))
                .color(annotation.color.as_str())
                .formatter(Formatter::String(annotation.text.clone())),
        )
}

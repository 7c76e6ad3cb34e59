use crate::{
    data::NumericSeries,
    error::DataResult,
    plots::{
        line::{LineChart, XAxis},
        AxisRange, FigurePlan, FigureSize, LinePlot, Plan, Stroke,
    },
    transform::position_of,
};

const SIZE: FigureSize = FigureSize::new(10.0, 6.0, 150);
const ITERATIONS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

static TITLE: &str = "RULER-4k: Self-Refinement Steps (Llama-3.1-8B-Instruct, 2% KV Cache)";
static X_LABEL: &str = "Iterations";
static Y_LABEL: &str = "RULER Accuracy (%)";

const COLOR_RANDOM_2: &str = "#4A90D9";
const COLOR_RANDOM_10: &str = "#27AE60";
const COLOR_KEYDIFF_2: &str = "#D94A4A";
const COLOR_KEYDIFF_10: &str = "#E8922E";

// (label, color, stroke, average RULER accuracy after each iteration)
// KV²+ is drawn solid, KV² dotted
static RUNS: [(&str, &str, Stroke, [f64; 5]); 8] = [
    ("KV²+ Random (2%)", COLOR_RANDOM_2, Stroke::Solid, [18.09, 40.09, 43.68, 47.72, 49.61]),
    ("KV² Random (2%)", COLOR_RANDOM_2, Stroke::Dotted, [17.3, 32.51, 36.91, 39.90, 40.30]),
    ("KV²+ Random (10%)", COLOR_RANDOM_10, Stroke::Solid, [21.92, 41.06, 46.64, 48.79, 50.73]),
    ("KV² Random (10%)", COLOR_RANDOM_10, Stroke::Dotted, [20.17, 35.28, 38.25, 39.25, 42.06]),
    ("KV²+ KeyDiff (2%)", COLOR_KEYDIFF_2, Stroke::Solid, [51.54, 55.40, 57.76, 57.75, 59.73]),
    ("KV² KeyDiff (2%)", COLOR_KEYDIFF_2, Stroke::Dotted, [53.36, 54.66, 54.53, 55.51, 55.85]),
    ("KV²+ KeyDiff (10%)", COLOR_KEYDIFF_10, Stroke::Solid, [60.87, 62.03, 62.54, 62.11, 61.41]),
    ("KV² KeyDiff (10%)", COLOR_KEYDIFF_10, Stroke::Dotted, [62.77, 63.13, 62.37, 61.23, 59.59]),
];

pub fn build() -> DataResult<Vec<FigurePlan>> {
    let mut lines = Vec::with_capacity(RUNS.len());

    for &(label, color, stroke, scores) in &RUNS {
        let series = NumericSeries::new(label, ITERATIONS.into_iter().zip(scores));
        series.validate()?;

        let points = series
            .sorted_points(false)
            .into_iter()
            .filter_map(|(iteration, score)| {
                position_of(&ITERATIONS, iteration).map(|pos| (pos as f64, score))
            })
            .collect();

        lines.push(LinePlot::new(label, color, stroke, points));
    }

    let x_axis = XAxis::Categories(ITERATIONS.iter().map(|i| i.to_string()).collect());
    let chart = LineChart::new(TITLE, X_LABEL, Y_LABEL, x_axis, AxisRange::new(0, 70))
        .with_lines(lines);

    Ok(vec![FigurePlan::new(
        "iterative_ruler",
        SIZE,
        Plan::Line(chart),
    )])
}

use crate::{
    data::{MethodTable, NumericSeries},
    error::DataResult,
    plots::{
        line::{compression_ratio_lines, LineChart},
        AxisRange, FigurePlan, FigureSize, Palette, Plan,
    },
};

const SIZE: FigureSize = FigureSize::new(10.0, 6.0, 150);
const NO_COMPRESSION: f64 = 92.9;

static TITLE: &str = "RULER 16k - Qwen3-8B";
static X_LABEL: &str = "Compression Ratio";
static Y_LABEL: &str = "Score (%)";

static COLORS: Palette = Palette(&[
    ("KVzip", "#E74C3C"),
    ("KV²", "#4A90D9"),
    ("KV² 3+", "#1B3A6B"),
    ("KeyDiff", "#000000"),
    ("Expected Attention", "#9B59B6"),
]);

// compression ratio -> RULER score
fn results() -> DataResult<MethodTable> {
    MethodTable::from_series([
        NumericSeries::new(
            "KVzip",
            [
                (0.0, 92.9),
                (0.25, 92.76),
                (0.5, 92.94),
                (0.75, 93.02),
                (0.9, 78.01),
                (0.95, 38.16),
                (0.98, 18.41),
                (0.99, 17.15),
            ],
        ),
        // two self-refinement steps
        NumericSeries::new(
            "KV²",
            [
                (0.0, 92.9),
                (0.25, 92.9),
                (0.5, 92.9),
                (0.75, 92.87),
                (0.9, 77.07),
                (0.95, 69.66),
                (0.98, 64.95),
                (0.99, 57.16),
            ],
        ),
        NumericSeries::new(
            "KeyDiff",
            [
                (0.0, 92.9),
                (0.25, 82.9),
                (0.5, 74.5),
                (0.75, 66.9),
                (0.9, 53.1),
                (0.95, 31.99),
                (0.98, 14.13),
                (0.99, 8.81),
            ],
        ),
        NumericSeries::new(
            "Expected Attention",
            [
                (0.0, 92.9),
                (0.25, 93.2),
                (0.5, 92.7),
                (0.75, 85.6),
                (0.9, 62.7),
                (0.95, 43.03),
                (0.98, 15.42),
                (0.99, 9.53),
            ],
        ),
    ])
}

/// Score over compression ratio for every method, with the uncompressed score as
/// a dashed reference.
pub fn plan(
    name: &str,
    title: &str,
    table: &MethodTable,
    no_compression: f64,
    palette: Palette,
) -> DataResult<FigurePlan> {
    let (x_axis, lines) = compression_ratio_lines(table, palette)?;

    let chart = LineChart::new(title, X_LABEL, Y_LABEL, x_axis, AxisRange::new(0, 100))
        .with_lines(lines)
        .with_baseline("No compression", no_compression);

    Ok(FigurePlan::new(name, SIZE, Plan::Line(chart)))
}

pub fn build() -> DataResult<Vec<FigurePlan>> {
    let table = results()?;
    Ok(vec![plan("ruler_16k", TITLE, &table, NO_COMPRESSION, COLORS)?])
}

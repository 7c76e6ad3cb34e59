use crate::{
    data::{CategorySeries, CategoryTable, Measurement::OutOfMemory},
    error::DataResult,
    plots::{
        bar::{BarChart, BarStyle},
        AxisRange, FigurePlan, FigureSize, Plan,
    },
};

const SIZE: FigureSize = FigureSize::new(8.0, 5.0, 150);
const TARGET_SECONDS: f64 = 20.0;

static TITLE: &str = "Compute Time per Repeat Chunk Size";
static X_LABEL: &str = "Repeat chunk size";
static Y_LABEL: &str = "Compute time (s)";
static REFERENCE_COLOR: &str = "#000000";

static CHUNK_SIZES: [&str; 9] = ["0.5k", "1k", "2k", "4k", "8k", "16k", "32k", "64k", "128k"];

static KVZIP: &str = "kvzip";
static KEYDIFF_HALF: &str = "kvsquared_keydiff_0.5";
static KEYDIFF_SMALL: &str = "kvsquared_keydiff_0.02";
static TWO_ITERATIONS: &str = "kvsquared_keydiff_2_iter";
static FIVE_ITERATIONS: &str = "kvsquared_keydiff_5_iter";

const KVZIP_STYLE: BarStyle = BarStyle {
    fill: "rgba(74, 144, 217, 0.5)",
    edge: "#4A90D9",
    oom_label_y: 130.0,
};
const KEYDIFF_HALF_STYLE: BarStyle = BarStyle {
    fill: "rgba(232, 77, 61, 0.5)",
    edge: "#E74C3C",
    oom_label_y: 90.0,
};
// the iteration counts refine the 0.02 run, so they share its stack
const KEYDIFF_SMALL_STYLE: BarStyle = BarStyle {
    fill: "rgba(38, 173, 97, 0.5)",
    edge: "#27AE60",
    oom_label_y: 0.0,
};
const TWO_ITERATIONS_STYLE: BarStyle = BarStyle {
    fill: "rgba(33, 140, 33, 0.5)",
    edge: "#228B22",
    oom_label_y: 0.0,
};
const FIVE_ITERATIONS_STYLE: BarStyle = BarStyle {
    fill: "rgba(0, 64, 0, 0.5)",
    edge: "#004000",
    oom_label_y: 0.0,
};

// seconds per chunk size; zero where the configuration was not run
fn results() -> DataResult<CategoryTable> {
    CategoryTable::new(
        CHUNK_SIZES,
        [
            CategorySeries::new(
                KVZIP,
                [
                    138.0.into(),
                    131.0.into(),
                    116.0.into(),
                    121.0.into(),
                    132.0.into(),
                    OutOfMemory,
                    OutOfMemory,
                    OutOfMemory,
                    OutOfMemory,
                ],
            ),
            CategorySeries::new(
                KEYDIFF_HALF,
                [
                    108.0.into(),
                    80.0.into(),
                    72.0.into(),
                    70.0.into(),
                    73.0.into(),
                    80.0.into(),
                    OutOfMemory,
                    OutOfMemory,
                    OutOfMemory,
                ],
            ),
            CategorySeries::new(
                KEYDIFF_SMALL,
                [98.0, 60.0, 41.0, 32.0, 27.0, 25.0, 25.0, 25.0, 26.0],
            ),
            CategorySeries::new(
                TWO_ITERATIONS,
                [0.0, 0.0, 0.0, 43.0, 34.0, 30.0, 30.0, 31.0, 35.0],
            ),
            CategorySeries::new(
                FIVE_ITERATIONS,
                [0.0, 0.0, 0.0, 77.0, 54.0, 47.0, 49.0, 55.0, 78.0],
            ),
        ],
    )
}

/// Two standalone bar groups and one stacked group per chunk size, with the
/// target compute time as a dashed reference.
pub fn plan(name: &str, table: &CategoryTable) -> DataResult<FigurePlan> {
    let mut chart = BarChart::new(
        TITLE,
        X_LABEL,
        Y_LABEL,
        table.categories(),
        AxisRange::new(0, 160),
    );

    chart.push_standalone(table.series(KVZIP)?, KVZIP_STYLE);
    chart.push_standalone(table.series(KEYDIFF_HALF)?, KEYDIFF_HALF_STYLE);
    chart.push_stack(
        KEYDIFF_SMALL,
        table.series(KEYDIFF_SMALL)?,
        &[
            table.series(TWO_ITERATIONS)?.clone(),
            table.series(FIVE_ITERATIONS)?.clone(),
        ],
        &[
            KEYDIFF_SMALL_STYLE,
            TWO_ITERATIONS_STYLE,
            FIVE_ITERATIONS_STYLE,
        ],
    );

    let chart = chart.with_reference(TARGET_SECONDS, REFERENCE_COLOR);
    Ok(FigurePlan::new(name, SIZE, Plan::Bar(chart)))
}

pub fn build() -> DataResult<Vec<FigurePlan>> {
    Ok(vec![plan("chunk_size_comparison", &results()?)?])
}

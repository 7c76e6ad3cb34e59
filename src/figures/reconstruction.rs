use crate::{
    data::{MethodTable, NumericSeries},
    error::DataResult,
    plots::{
        line::{value_lines, LineChart, XAxis},
        AxisRange, FigurePlan, FigureSize, Palette, Plan,
    },
};

const SIZE: FigureSize = FigureSize::new(10.0, 6.0, 150);

const QWEN_FULL: f64 = 94.66;
const LLAMA_FULL: f64 = 95.61;

static X_LABEL: &str = "KeyDiff Reconstruction Percentage";
static Y_LABEL: &str = "RULER Accuracy (%)";

static COLORS: Palette = Palette(&[
    ("KV Size = 2%", "#E74C3C"),
    ("KV Size = 5%", "#27AE60"),
    ("KV Size = 10%", "#4A90D9"),
]);

// reconstruction percentage -> average RULER-4k score, per KV size
fn qwen_results() -> DataResult<MethodTable> {
    MethodTable::from_series([
        NumericSeries::new(
            "KV Size = 2%",
            [
                (1.0, 46.40),
                (2.0, 49.05),
                (5.0, 49.98),
                (10.0, 52.46),
                (25.0, 49.88),
            ],
        ),
        NumericSeries::new(
            "KV Size = 5%",
            [
                (5.0, 65.73),
                (10.0, 66.17),
                (25.0, 68.09),
                (50.0, 64.63),
                (75.0, 54.61),
            ],
        ),
        NumericSeries::new(
            "KV Size = 10%",
            [(10.0, 73.89), (50.0, 83.79), (75.0, 87.02), (100.0, 86.40)],
        ),
    ])
}

fn llama_results() -> DataResult<MethodTable> {
    MethodTable::from_series([
        NumericSeries::new(
            "KV Size = 2%",
            [
                (1.0, 44.07),
                (2.0, 53.36),
                (5.0, 60.96),
                (10.0, 62.77),
                (25.0, 59.88),
                (50.0, 35.74),
            ],
        ),
        NumericSeries::new(
            "KV Size = 5%",
            [
                (2.0, 64.10),
                (5.0, 67.22),
                (10.0, 69.39),
                (25.0, 72.55),
                (50.0, 72.87),
                (75.0, 68.96),
                (100.0, 62.84),
            ],
        ),
        NumericSeries::new(
            "KV Size = 10%",
            [(50.0, 85.42), (75.0, 88.11), (90.0, 89.69), (100.0, 89.71)],
        ),
    ])
}

fn plan(name: &str, title: &str, table: &MethodTable, full_score: f64) -> FigurePlan {
    let x_axis = XAxis::Values {
        range: AxisRange::new(0, 100),
        inverse: false,
        percent_labels: true,
    };

    let chart = LineChart::new(title, X_LABEL, Y_LABEL, x_axis, AxisRange::new(0, 100))
        .with_lines(value_lines(table, COLORS, false))
        .with_baseline("Full KV cache", full_score);

    FigurePlan::new(name, SIZE, Plan::Line(chart))
}

pub fn build() -> DataResult<Vec<FigurePlan>> {
    let qwen = qwen_results()?;
    let llama = llama_results()?;

    Ok(vec![
        plan(
            "reconstruction_qwen",
            "KV² + KeyDiff: Qwen3-8B (RULER-4k)",
            &qwen,
            QWEN_FULL,
        ),
        plan(
            "reconstruction_llama",
            "KV² + KeyDiff: Llama-3.1-8B-Instruct (RULER-4k)",
            &llama,
            LLAMA_FULL,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kv_size_is_a_colored_line() {
        let plans = build().unwrap();
        let Plan::Line(chart) = &plans[0].plan else {
            panic!("expected a line chart");
        };

        let colors: Vec<_> = chart.lines.iter().map(|l| l.color.as_str()).collect();
        assert_eq!(colors, vec!["#E74C3C", "#27AE60", "#4A90D9"]);
        assert_eq!(chart.lines[2].points.first(), Some(&(10.0, 73.89)));
    }
}

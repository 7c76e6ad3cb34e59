use crate::{
    data::{MethodTable, NumericSeries},
    error::DataResult,
    plots::{
        line::{value_lines, LineChart, XAxis},
        AxisRange, FigurePlan, FigureSize, Palette, Plan,
    },
};

const SIZE: FigureSize = FigureSize::new(10.0, 6.0, 150);

// full KV cache baselines
const QWEN_FULL: f64 = 94.66;
const LLAMA_FULL: f64 = 95.61;

static X_LABEL: &str = "KV Cache Size";
static Y_LABEL: &str = "RULER Accuracy (%)";

static COLORS: Palette = Palette(&[
    ("KeyDiff", "#000000"),
    ("ExpectedAttention", "#9B59B6"),
    ("KVzip", "#E74C3C"),
    ("KV²", "#4A90D9"),
]);

// KV size in percent -> average RULER-4k score
fn qwen_results() -> DataResult<MethodTable> {
    MethodTable::from_series([
        NumericSeries::new("KeyDiff", [(2.0, 10.37), (5.0, 19.73), (10.0, 37.15)]),
        NumericSeries::new("ExpectedAttention", [(2.0, 7.48), (5.0, 36.80), (10.0, 63.60)]),
        NumericSeries::new("KVzip", [(2.0, 18.08), (5.0, 36.04), (10.0, 86.94)]),
        NumericSeries::new("KV²", [(2.0, 49.05), (5.0, 65.73), (10.0, 73.89)]),
    ])
}

fn llama_results() -> DataResult<MethodTable> {
    MethodTable::from_series([
        NumericSeries::new("KeyDiff", [(2.0, 23.22), (5.0, 47.11), (10.0, 60.43)]),
        NumericSeries::new("ExpectedAttention", [(2.0, 7.22), (5.0, 12.74), (10.0, 30.10)]),
        NumericSeries::new("KVzip", [(2.0, 17.93), (5.0, 63.37), (10.0, 91.14)]),
        NumericSeries::new("KV²", [(2.0, 53.36), (5.0, 67.22), (10.0, 76.35)]),
    ])
}

fn plan(name: &str, title: &str, table: &MethodTable, full_score: f64) -> FigurePlan {
    // larger caches on the left, shrinking towards 0%
    let x_axis = XAxis::Values {
        range: AxisRange::new(0, 15),
        inverse: true,
        percent_labels: true,
    };

    let chart = LineChart::new(title, X_LABEL, Y_LABEL, x_axis, AxisRange::new(0, 100))
        .with_lines(value_lines(table, COLORS, true))
        .with_baseline("Full KV cache", full_score);

    FigurePlan::new(name, SIZE, Plan::Line(chart))
}

pub fn build() -> DataResult<Vec<FigurePlan>> {
    let qwen = qwen_results()?;
    let llama = llama_results()?;

    Ok(vec![
        plan("ruler_qwen", "RULER-4k: Qwen3-8B", &qwen, QWEN_FULL),
        plan(
            "ruler_llama",
            "RULER-4k: Llama-3.1-8B-Instruct",
            &llama,
            LLAMA_FULL,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_image_per_model() {
        let plans = build().unwrap();
        let names: Vec<_> = plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ruler_qwen", "ruler_llama"]);
    }

    #[test]
    fn kv_sizes_run_from_large_to_small() {
        let plans = build().unwrap();
        let Plan::Line(chart) = &plans[1].plan else {
            panic!("expected a line chart");
        };

        assert!(matches!(chart.x_axis, XAxis::Values { inverse: true, .. }));
        for line in &chart.lines {
            let xs: Vec<_> = line.points.iter().map(|p| p.0).collect();
            assert_eq!(xs, vec![10.0, 5.0, 2.0]);
        }
        assert_eq!(chart.reference.as_ref().map(|r| r.y), Some(LLAMA_FULL));
    }
}

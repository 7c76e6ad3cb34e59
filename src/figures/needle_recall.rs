use crate::{
    data::RecallSource,
    error::DataResult,
    plots::{
        colormap::{Colormap, Rgb},
        heatmap::{HeatmapGrid, HeatmapPanel},
        FigurePlan, FigureSize, Plan,
    },
    transform::recall_matrix,
};

const SIZE: FigureSize = FigureSize::new(16.0, 10.0, 300);
const PANELS_PER_ROW: usize = 2;

const DEPTHS: [u32; 9] = [15, 25, 35, 45, 55, 65, 75, 85, 95];
const CONTEXT_LENGTH_STEP: u32 = 10000;
const MAX_CONTEXT_LENGTH: u32 = 130000;

static TITLE: &str = "Needle-in-Haystack: Llama-3.1-8B, 5% KV size";
static X_LABEL: &str = "Context Length";
static Y_LABEL: &str = "Depth Percent";
static HOLE_COLOR: &str = "#d9d9d9";

// everything below 0.2 is already red, high recall is bright green
static RECALL_COLORS: [(f64, u32); 8] = [
    (0.0, 0xd93a54),
    (0.2, 0xd93a54),
    (0.35, 0xeb6e5a),
    (0.5, 0xf0a05a),
    (0.6, 0xe8c84a),
    (0.75, 0x9dd870),
    (0.9, 0x48c78e),
    (1.0, 0x2abb7f),
];

type RecallTable = [(&'static str, [f64; 9]); 13];

// recall per needle depth, in `DEPTHS` order
static KEYDIFF: RecallTable = [
    ("len_10000", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0]),
    ("len_20000", [1.0, 0.5714, 1.0, 0.5714, 1.0, 0.6364, 1.0, 1.0, 1.0]),
    ("len_30000", [1.0, 0.4545, 0.5714, 0.2759, 0.2143, 1.0, 0.1786, 1.0, 1.0]),
    ("len_40000", [0.5714, 0.7368, 0.2143, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
    ("len_50000", [0.5556, 0.3684, 0.6364, 0.4545, 1.0, 0.4231, 1.0, 1.0, 1.0]),
    ("len_60000", [1.0, 1.0, 1.0, 0.25, 0.1875, 1.0, 1.0, 0.2727, 1.0]),
    ("len_70000", [1.0, 1.0, 0.875, 1.0, 0.1579, 1.0, 1.0, 1.0, 1.0]),
    ("len_80000", [1.0, 0.2857, 1.0, 0.3333, 1.0, 1.0, 1.0, 1.0, 1.0]),
    ("len_90000", [0.2667, 0.2667, 1.0, 1.0, 1.0, 0.4444, 0.3333, 1.0, 1.0]),
    ("len_100000", [0.8571, 0.8571, 1.0, 0.3333, 0.3333, 1.0, 1.0, 1.0, 1.0]),
    ("len_110000", [0.4444, 0.8571, 1.0, 0.6, 0.6667, 1.0, 0.75, 0.25, 1.0]),
    ("len_120000", [0.8571, 0.8571, 0.7143, 1.0, 1.0, 1.0, 0.3333, 1.0, 1.0]),
    ("len_130000", [0.75, 0.375, 1.0, 0.4, 1.0, 0.2, 0.2857, 1.0, 1.0]),
];

static KVZIP: RecallTable = [
    ("len_10000", [1.0, 1.0, 1.0, 1.0, 1.0, 0.2857, 1.0, 1.0, 1.0]),
    ("len_20000", [1.0, 1.0, 1.0, 1.0, 1.0, 0.1818, 1.0, 1.0, 1.0]),
    ("len_30000", [1.0, 0.3333, 0.3333, 1.0, 0.3333, 1.0, 0.3333, 0.3333, 0.3333]),
    ("len_40000", [0.3571, 0.1667, 0.3571, 1.0, 1.0, 0.3333, 1.0, 0.3333, 1.0]),
    ("len_50000", [0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 0.1818, 0.3333, 1.0, 1.0]),
    ("len_60000", [0.3333, 1.0, 1.0, 0.3333, 1.0, 1.0, 0.3333, 0.3333, 1.0]),
    ("len_70000", [0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 1.0, 0.3333, 0.3333, 1.0]),
    ("len_80000", [0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 1.0, 0.3333]),
    ("len_90000", [0.3333; 9]),
    ("len_100000", [0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 1.0, 0.3333, 0.3333]),
    ("len_110000", [0.3333; 9]),
    ("len_120000", [0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 1.0, 0.3333, 0.3333]),
    ("len_130000", [1.0, 0.4, 0.3333, 0.4, 0.1818, 1.0, 0.2667, 1.0, 0.4]),
];

static EXPECTED_ATTENTION: RecallTable = [
    ("len_10000", [0.1818, 0.1818, 0.1818, 0.1818, 0.1818, 0.1818, 0.1818, 0.1818, 0.1935]),
    ("len_20000", [0.1818, 0.1818, 0.1818, 0.1818, 0.1818, 0.1765, 0.1818, 0.1765, 0.1818]),
    ("len_30000", [0.4444, 0.1852, 0.5, 0.5, 0.2, 0.3333, 0.5, 0.5, 0.5]),
    ("len_40000", [0.2083, 0.1923, 0.1923, 0.2143, 0.1923, 0.1765, 0.2143, 0.1923, 0.4667]),
    ("len_50000", [0.2069, 0.3, 0.3333, 0.3333, 0.3, 0.3333, 0.2273, 0.3333, 0.3]),
    ("len_60000", [0.2381, 0.2381, 0.2667, 0.2667, 0.3333, 0.4211, 0.2381, 0.2667, 0.3333]),
    ("len_70000", [0.3571, 0.3571, 0.3889, 0.2857, 0.2857, 0.3571, 0.3571, 0.2174, 0.3]),
    ("len_80000", [0.2593, 0.3571, 0.2593, 0.3571, 0.3, 0.3571, 0.3571, 0.2593, 0.2857]),
    ("len_90000", [0.15, 0.2143, 0.15, 0.15, 0.15, 0.2593, 0.15, 0.15, 0.2143]),
    ("len_100000", [0.3333, 0.3846, 0.3846, 0.2941, 0.3333, 0.2941, 0.3846, 0.2941, 0.2941]),
    ("len_110000", [0.3333, 0.3333, 0.3333, 0.3846, 0.3846, 0.3846, 0.3846, 0.3846, 0.3846]),
    ("len_120000", [0.125, 0.5, 0.3125, 0.3125, 0.5, 0.5, 0.3125, 0.3125, 0.3125]),
    ("len_130000", [0.3333, 0.3333, 0.3333, 0.3333, 0.3333, 0.6, 0.6, 0.3333, 0.2857]),
];

static KV_SQUARED: RecallTable = [
    ("len_10000", [1.0; 9]),
    ("len_20000", [1.0, 1.0, 0.8462, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
    ("len_30000", [1.0; 9]),
    ("len_40000", [1.0; 9]),
    ("len_50000", [1.0; 9]),
    ("len_60000", [1.0; 9]),
    ("len_70000", [1.0; 9]),
    ("len_80000", [1.0; 9]),
    ("len_90000", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.2632, 1.0, 1.0]),
    ("len_100000", [1.0, 1.0, 1.0, 1.0, 0.3333, 1.0, 1.0, 1.0, 1.0]),
    ("len_110000", [1.0; 9]),
    ("len_120000", [1.0, 1.0, 1.0, 0.4, 1.0, 1.0, 1.0, 1.0, 1.0]),
    ("len_130000", [1.0; 9]),
];

fn context_lengths() -> Vec<u32> {
    (CONTEXT_LENGTH_STEP..=MAX_CONTEXT_LENGTH)
        .step_by(CONTEXT_LENGTH_STEP as usize)
        .collect()
}

fn sources() -> Vec<RecallSource> {
    [
        ("KeyDiff", &KEYDIFF),
        ("KVzip", &KVZIP),
        ("Expected Attention", &EXPECTED_ATTENTION),
        ("KV²", &KV_SQUARED),
    ]
    .into_iter()
    .map(|(method, table)| RecallSource::complete(method, table.iter().copied()))
    .collect()
}

fn recall_colormap() -> Colormap {
    Colormap::new(
        RECALL_COLORS
            .iter()
            .map(|&(position, hex)| (position, Rgb::from_hex(hex))),
    )
}

/// One heatmap panel per method, all reshaped onto the same depth x context grid.
pub fn plan(
    name: &str,
    sources: &[RecallSource],
    context_lengths: &[u32],
    depths: &[u32],
) -> DataResult<FigurePlan> {
    let panels = sources
        .iter()
        .map(|source| {
            Ok(HeatmapPanel {
                title: source.method.clone(),
                matrix: recall_matrix(source, context_lengths, depths)?,
            })
        })
        .collect::<DataResult<Vec<_>>>()?;

    let grid = HeatmapGrid {
        title: TITLE.to_owned(),
        x_label: X_LABEL.to_owned(),
        y_label: Y_LABEL.to_owned(),
        columns: context_lengths.iter().map(u32::to_string).collect(),
        rows: depths.iter().map(u32::to_string).collect(),
        panels,
        panels_per_row: PANELS_PER_ROW,
        colormap: recall_colormap(),
        hole_color: HOLE_COLOR.to_owned(),
    };

    Ok(FigurePlan::new(name, SIZE, Plan::Heatmap(grid)))
}

pub fn build() -> DataResult<Vec<FigurePlan>> {
    Ok(vec![plan(
        "needle_recall_heatmaps",
        &sources(),
        &context_lengths(),
        &DEPTHS,
    )?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    #[test]
    fn thirteen_contexts_by_nine_depths() {
        let plans = build().unwrap();
        let Plan::Heatmap(grid) = &plans[0].plan else {
            panic!("expected a heatmap");
        };

        assert_eq!(grid.columns.first().map(String::as_str), Some("10000"));
        assert_eq!(grid.columns.last().map(String::as_str), Some("130000"));
        assert_eq!(grid.panels.len(), 4);
        for panel in &grid.panels {
            assert_eq!(panel.matrix.num_rows(), 9);
            assert_eq!(panel.matrix.num_columns(), 13);
            assert_eq!(panel.matrix.num_holes(), 0);
        }
    }

    #[test]
    fn cells_match_recorded_lists() {
        let plans = build().unwrap();
        let Plan::Heatmap(grid) = &plans[0].plan else {
            panic!("expected a heatmap");
        };

        // KeyDiff at 10000 tokens, depth 85
        assert_eq!(grid.panels[0].matrix.get(7, 0), Some(0.5));
        // KV² at 90000 tokens, depth 75
        assert_eq!(grid.panels[3].matrix.get(6, 8), Some(0.2632));
    }

    #[test]
    fn unrecorded_entries_stay_holes() {
        let mut values = vec![Some(1.0); DEPTHS.len()];
        values[4] = None;
        let source = RecallSource::new(
            "KV²",
            context_lengths()
                .into_iter()
                .map(|context| (format!("len_{context}"), values.clone())),
        );

        let plan = plan("holes", &[source], &context_lengths(), &DEPTHS).unwrap();
        let Plan::Heatmap(grid) = &plan.plan else {
            panic!("expected a heatmap");
        };
        assert_eq!(grid.panels[0].matrix.num_holes(), 13);
        assert_eq!(grid.panels[0].matrix.get(4, 0), None);
    }

    #[test]
    fn source_without_a_context_length_fails() {
        let source = RecallSource::complete(
            "KeyDiff",
            KEYDIFF
                .iter()
                .copied()
                .filter(|(key, _)| *key != "len_70000"),
        );

        let err = plan("broken", &[source], &context_lengths(), &DEPTHS).unwrap_err();
        assert_eq!(
            err,
            DataError::MissingKey {
                source_name: "KeyDiff".into(),
                key: "len_70000".into()
            }
        );
    }

    #[test]
    fn low_recall_is_red_and_perfect_recall_green() {
        let colormap = recall_colormap();
        assert_eq!(colormap.sample(0.1), Rgb::from_hex(0xd93a54));
        assert_eq!(colormap.sample(1.0), Rgb::from_hex(0x2abb7f));
    }
}

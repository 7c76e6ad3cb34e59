use crate::{
    data::{context_key, CategorySeries, Measurement, RecallSource},
    error::{DataError, DataResult},
};

/// Sorted, deduplicated x values. Index in the result is the equidistant axis position.
pub fn equidistant_positions(xs: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut xs: Vec<f64> = xs.into_iter().collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs
}

pub fn position_of(positions: &[f64], x: f64) -> Option<usize> {
    positions.iter().position(|&p| p == x)
}

/// Bar heights with OOM entries flattened to zero, and where they were.
#[derive(Debug, Clone, PartialEq)]
pub struct OomSplit {
    pub heights: Vec<f64>,
    pub oom_indices: Vec<usize>,
}

pub fn split_oom(values: &[Measurement]) -> OomSplit {
    let heights = values.iter().map(Measurement::drawn_height).collect();
    let oom_indices = values
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_out_of_memory())
        .map(|(index, _)| index)
        .collect();

    OomSplit {
        heights,
        oom_indices,
    }
}

/// Positions and values to connect with a trend line. Only strictly positive
/// values take part, and a single point is not a line.
pub fn trend_points(values: &[Measurement]) -> Vec<(f64, f64)> {
    let points: Vec<_> = values
        .iter()
        .enumerate()
        .filter_map(|(index, m)| m.value().filter(|&v| v > 0.0).map(|v| (index as f64, v)))
        .collect();

    if points.len() > 1 {
        points
    } else {
        Vec::new()
    }
}

/// One drawn layer of a stacked bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSegment {
    pub name: String,
    pub baseline: Vec<f64>,
    pub heights: Vec<f64>,
}

/// Decomposes `base` plus `layers` into visible segments. A layer only adds the
/// part above what is already drawn; layers without a positive value are skipped
/// and the next layer sits on the last drawn top.
pub fn stack_layers(base: &CategorySeries, layers: &[CategorySeries]) -> Vec<StackSegment> {
    let base_heights: Vec<f64> = base.values.iter().map(Measurement::drawn_height).collect();
    let mut cumulative = base_heights.clone();

    let mut segments = vec![StackSegment {
        name: base.name.clone(),
        baseline: vec![0.0; base_heights.len()],
        heights: base_heights,
    }];

    for layer in layers {
        let mut baseline = Vec::with_capacity(cumulative.len());
        let mut heights = Vec::with_capacity(cumulative.len());

        for (index, top) in cumulative.iter_mut().enumerate() {
            baseline.push(*top);

            let value = layer
                .values
                .get(index)
                .and_then(Measurement::value)
                .filter(|&v| v > 0.0);

            match value {
                Some(value) => {
                    let extra = (value - *top).max(0.0);
                    heights.push(extra);
                    *top += extra;
                }
                None => heights.push(0.0),
            }
        }

        segments.push(StackSegment {
            name: layer.name.clone(),
            baseline,
            heights,
        });
    }

    segments
}

/// Recall values laid out as `[depth][context]`. `None` cells are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallMatrix {
    cells: Vec<Vec<Option<f64>>>,
}

impl RecallMatrix {
    pub fn get(&self, depth_index: usize, context_index: usize) -> Option<f64> {
        self.cells
            .get(depth_index)
            .and_then(|row| row.get(context_index))
            .copied()
            .flatten()
    }

    pub fn num_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn num_columns(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// `(column, row, value)` for every cell that has data.
    pub fn present_cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .filter_map(move |(column, value)| value.map(|v| (column, row, v)))
        })
    }

    pub fn num_holes(&self) -> usize {
        self.cells.iter().flatten().filter(|v| v.is_none()).count()
    }
}

/// Projects `len_<context>` lists into a matrix. Columns follow `context_lengths`,
/// rows follow `depths`.
pub fn recall_matrix(
    source: &RecallSource,
    context_lengths: &[u32],
    depths: &[u32],
) -> DataResult<RecallMatrix> {
    let mut columns = Vec::with_capacity(context_lengths.len());

    for &context_length in context_lengths {
        let key = context_key(context_length);
        let values = source.get(&key).ok_or_else(|| DataError::MissingKey {
            source_name: source.method.clone(),
            key: key.clone(),
        })?;

        if values.len() != depths.len() {
            return Err(DataError::LengthMismatch {
                key,
                expected: depths.len(),
                actual: values.len(),
            });
        }

        for (index, value) in values.iter().enumerate() {
            let Some(value) = *value else { continue };
            if !value.is_finite() {
                return Err(DataError::NonFinite {
                    key: format!("{}/{key}", source.method),
                    index,
                });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(DataError::OutOfRange {
                    key: format!("{}/{key}", source.method),
                    index,
                    value,
                });
            }
        }

        columns.push(values);
    }

    let cells = (0..depths.len())
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect();

    Ok(RecallMatrix { cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Measurement::{Missing, OutOfMemory, Value};

    const DEPTHS: [u32; 3] = [15, 55, 95];
    const CONTEXTS: [u32; 2] = [10000, 20000];

    fn source() -> RecallSource {
        RecallSource::new(
            "KVzip",
            [
                ("len_20000".to_owned(), vec![Some(0.5), None, Some(1.0)]),
                ("len_10000".to_owned(), vec![Some(1.0), Some(0.25), Some(0.0)]),
            ],
        )
    }

    #[test]
    fn reshape_keeps_values_at_depth_and_context() {
        let matrix = recall_matrix(&source(), &CONTEXTS, &DEPTHS).unwrap();

        assert_eq!(matrix.num_rows(), 3);
        assert_eq!(matrix.num_columns(), 2);

        let src = source();
        for (column, &context) in CONTEXTS.iter().enumerate() {
            let literal = src.get(&context_key(context)).unwrap();
            for row in 0..DEPTHS.len() {
                assert_eq!(matrix.get(row, column), literal[row]);
            }
        }
    }

    #[test]
    fn missing_values_become_holes_not_zeros() {
        let matrix = recall_matrix(&source(), &CONTEXTS, &DEPTHS).unwrap();

        assert_eq!(matrix.num_holes(), 1);
        assert_eq!(matrix.get(1, 1), None);
        assert_eq!(matrix.get(2, 0), Some(0.0));
        assert_eq!(matrix.present_cells().count(), 5);
    }

    #[test]
    fn missing_context_key_is_named() {
        let contexts = [10000, 20000, 70000];
        let err = recall_matrix(&source(), &contexts, &DEPTHS).unwrap_err();

        assert_eq!(
            err,
            DataError::MissingKey {
                source_name: "KVzip".into(),
                key: "len_70000".into()
            }
        );
        assert!(err.to_string().contains("len_70000"));
    }

    #[test]
    fn wrong_number_of_depths_is_reported() {
        let err = recall_matrix(&source(), &CONTEXTS, &[15, 55]).unwrap_err();
        assert_eq!(
            err,
            DataError::LengthMismatch {
                key: "len_10000".into(),
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn recall_above_one_is_a_range_error() {
        let bad = RecallSource::new(
            "KeyDiff",
            [
                ("len_10000".to_owned(), vec![Some(1.0), Some(1.2), None]),
                ("len_20000".to_owned(), vec![Some(1.0), Some(1.0), Some(1.0)]),
            ],
        );
        let err = recall_matrix(&bad, &CONTEXTS, &DEPTHS).unwrap_err();
        assert!(matches!(err, DataError::OutOfRange { index: 1, value, .. } if value == 1.2));
    }

    #[test]
    fn ratios_are_sorted_and_deduplicated() {
        let positions = equidistant_positions([0.5, 0.0, 0.99, 0.5, 0.25]);
        assert_eq!(positions, vec![0.0, 0.25, 0.5, 0.99]);
        assert_eq!(position_of(&positions, 0.99), Some(3));
        assert_eq!(position_of(&positions, 0.9), None);
    }

    #[test]
    fn oom_is_zero_height_and_remembered() {
        let split = split_oom(&[Value(138.0), OutOfMemory, Value(116.0), OutOfMemory]);
        assert_eq!(split.heights, vec![138.0, 0.0, 116.0, 0.0]);
        assert_eq!(split.oom_indices, vec![1, 3]);
    }

    #[test]
    fn trend_skips_non_positive_values() {
        let points = trend_points(&[Value(0.0), Value(43.0), Missing, Value(30.0)]);
        assert_eq!(points, vec![(1.0, 43.0), (3.0, 30.0)]);
        assert!(trend_points(&[Value(5.0), OutOfMemory]).is_empty());
    }

    #[test]
    fn stacked_layers_reconstruct_literal_values() {
        let base = CategorySeries::new("base", [98.0, 32.0, 25.0]);
        let layers = [
            CategorySeries::new("two", [0.0, 43.0, 30.0]),
            CategorySeries::new("five", [0.0, 77.0, 47.0]),
        ];

        let segments = stack_layers(&base, &layers);
        assert_eq!(segments.len(), 3);

        for (layer_index, layer) in layers.iter().enumerate() {
            for (index, m) in layer.values.iter().enumerate() {
                let Some(value) = m.value().filter(|&v| v > 0.0) else {
                    continue;
                };
                let rebuilt: f64 = segments[..=layer_index + 1]
                    .iter()
                    .map(|s| s.heights[index])
                    .sum();
                assert!((rebuilt - value).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn layer_without_value_is_skipped_by_next_layer() {
        let base = CategorySeries::new("base", [20.0]);
        let layers = [
            CategorySeries::new("middle", [Missing]),
            CategorySeries::new("top", [Value(50.0)]),
        ];

        let segments = stack_layers(&base, &layers);
        assert_eq!(segments[1].heights, vec![0.0]);
        assert_eq!(segments[2].baseline, vec![20.0]);
        assert_eq!(segments[2].heights, vec![30.0]);
    }

    #[test]
    fn layer_below_current_top_adds_nothing() {
        let base = CategorySeries::new("base", [40.0]);
        let layers = [CategorySeries::new("lower", [30.0])];

        let segments = stack_layers(&base, &layers);
        assert_eq!(segments[1].heights, vec![0.0]);
        assert_eq!(segments[1].baseline, vec![40.0]);
    }
}

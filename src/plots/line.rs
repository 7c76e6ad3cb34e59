use charming::{component::Grid, Chart};

use super::{
    base_chart, category_axis, legend, line_series, percent_labels, reference_series, value_axis,
    AxisRange, FigureSize, LinePlot, Palette, ReferenceLine, Stroke,
};
use crate::{
    data::MethodTable,
    error::DataResult,
    transform::{equidistant_positions, position_of},
};

#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Equidistant labelled positions; line x values are category indices.
    Categories(Vec<String>),
    Values {
        range: AxisRange,
        inverse: bool,
        percent_labels: bool,
    },
}

impl XAxis {
    fn span(&self) -> (f64, f64) {
        match self {
            XAxis::Categories(labels) => (0.0, labels.len().saturating_sub(1) as f64),
            XAxis::Values { range, .. } => (range.min as f64, range.max as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub y_range: AxisRange,
    pub lines: Vec<LinePlot>,
    pub reference: Option<ReferenceLine>,
}

impl LineChart {
    pub fn new(
        title: &str,
        x_label: &str,
        y_label: &str,
        x_axis: XAxis,
        y_range: AxisRange,
    ) -> Self {
        Self {
            title: title.to_owned(),
            x_label: x_label.to_owned(),
            y_label: y_label.to_owned(),
            x_axis,
            y_range,
            lines: Vec::new(),
            reference: None,
        }
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = LinePlot>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Adds the gray dashed "no compression" style reference.
    pub fn with_baseline(mut self, name: &str, y: f64) -> Self {
        self.reference = Some(ReferenceLine {
            name: Some(name.to_owned()),
            y,
            color: "gray".to_owned(),
        });
        self
    }

    pub fn to_chart(&self, size: &FigureSize) -> Chart {
        let x_axis = match &self.x_axis {
            XAxis::Categories(labels) => category_axis(&self.x_label, labels, size),
            XAxis::Values {
                range,
                inverse,
                percent_labels: percent,
            } => {
                let axis = value_axis(&self.x_label, *range, size).inverse(*inverse);
                if *percent {
                    axis.axis_label(percent_labels(size))
                } else {
                    axis
                }
            }
        };

        let mut chart = base_chart(&self.title, size)
            .legend(legend(size))
            .grid(Grid::new().top("18%").left("8%").right("4%").bottom("12%"))
            .x_axis(x_axis)
            .y_axis(value_axis(&self.y_label, self.y_range, size));

        for line in &self.lines {
            chart = chart.series(line_series(line, size));
        }

        if let Some(reference) = &self.reference {
            chart = chart.series(reference_series(reference, self.x_axis.span(), size));
        }

        chart
    }
}

/// Score over compression ratio. Every ratio seen in any method gets its own
/// equidistant slot, labelled as a whole percentage.
pub fn compression_ratio_lines(
    table: &MethodTable,
    palette: Palette,
) -> DataResult<(XAxis, Vec<LinePlot>)> {
    table.ensure_fractional_x()?;

    let positions = equidistant_positions(table.iter().flat_map(|series| series.xs()));
    let labels = positions
        .iter()
        .map(|ratio| format!("{}%", (ratio * 100.0).round() as i64))
        .collect();

    let lines = table
        .iter()
        .map(|series| {
            let points = series
                .sorted_points(false)
                .into_iter()
                .filter_map(|(x, y)| position_of(&positions, x).map(|pos| (pos as f64, y)))
                .collect();
            LinePlot::new(
                series.name(),
                palette.color_for(series.name()),
                Stroke::Solid,
                points,
            )
        })
        .collect();

    Ok((XAxis::Categories(labels), lines))
}

/// One solid line per method on a value x axis, points ordered by x.
pub fn value_lines(table: &MethodTable, palette: Palette, descending: bool) -> Vec<LinePlot> {
    table
        .iter()
        .map(|series| {
            LinePlot::new(
                series.name(),
                palette.color_for(series.name()),
                Stroke::Solid,
                series.sorted_points(descending),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NumericSeries;

    static COLORS: Palette = Palette(&[("A", "#E74C3C"), ("B", "#4A90D9")]);

    fn two_methods() -> MethodTable {
        MethodTable::from_series([
            NumericSeries::new("A", [(0.0, 92.9), (0.5, 80.0)]),
            NumericSeries::new("B", [(0.5, 85.0), (0.0, 92.9)]),
        ])
        .unwrap()
    }

    #[test]
    fn two_methods_and_a_baseline() {
        let (x_axis, lines) = compression_ratio_lines(&two_methods(), COLORS).unwrap();
        let chart = LineChart::new(
            "RULER",
            "Compression Ratio",
            "Score (%)",
            x_axis,
            AxisRange::new(0, 100),
        )
        .with_lines(lines)
        .with_baseline("No compression", 92.9);

        assert_eq!(chart.lines.len(), 2);
        assert_eq!(chart.y_range, AxisRange::new(0, 100));

        let reference = chart.reference.as_ref().unwrap();
        assert_eq!(reference.y, 92.9);
        assert_eq!(reference.name.as_deref(), Some("No compression"));

        assert_eq!(chart.lines[1].points, vec![(0.0, 92.9), (1.0, 85.0)]);
        assert_eq!(chart.lines[1].color, "#4A90D9");
    }

    #[test]
    fn every_ratio_appears_once_in_order() {
        let table = MethodTable::from_series([
            NumericSeries::new("A", [(0.9, 53.1), (0.0, 92.9), (0.25, 82.9)]),
            NumericSeries::new("B", [(0.99, 9.5), (0.25, 93.2), (0.0, 92.9)]),
        ])
        .unwrap();

        let (x_axis, lines) = compression_ratio_lines(&table, COLORS).unwrap();
        assert_eq!(
            x_axis,
            XAxis::Categories(vec![
                "0%".into(),
                "25%".into(),
                "90%".into(),
                "99%".into()
            ])
        );
        assert_eq!(
            lines[0].points,
            vec![(0.0, 92.9), (1.0, 82.9), (2.0, 53.1)]
        );
        assert_eq!(lines[1].points, vec![(0.0, 92.9), (1.0, 93.2), (3.0, 9.5)]);
    }

    #[test]
    fn ratio_labels_round_to_the_nearest_percent() {
        // 0.29 * 100.0 is 28.999999999999996
        let table =
            MethodTable::from_series([NumericSeries::new("A", [(0.29, 80.0), (0.5, 70.0)])])
                .unwrap();

        let (x_axis, _) = compression_ratio_lines(&table, COLORS).unwrap();
        assert_eq!(x_axis, XAxis::Categories(vec!["29%".into(), "50%".into()]));
    }

    #[test]
    fn ratio_outside_unit_interval_fails_before_planning() {
        let table =
            MethodTable::from_series([NumericSeries::new("A", [(0.0, 92.9), (2.0, 1.0)])])
                .unwrap();
        assert!(compression_ratio_lines(&table, COLORS).is_err());
    }

    #[test]
    fn value_lines_keep_legend_order() {
        let lines = value_lines(&two_methods(), COLORS, true);
        let names: Vec<_> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(lines[0].points, vec![(0.5, 80.0), (0.0, 92.9)]);
    }

    #[test]
    fn category_reference_spans_all_slots() {
        let axis = XAxis::Categories(vec!["0%".into(), "50%".into(), "90%".into()]);
        assert_eq!(axis.span(), (0.0, 2.0));
    }
}

use charming::{
    component::{Axis, Grid, Title, VisualMap, VisualMapChannel},
    datatype::DataPoint,
    element::{AxisType, Color, NameLocation, TextStyle},
    series::Heatmap,
    Chart,
};

use super::{
    axis_name_style, base_chart, colormap::Colormap, tick_labels, FigureSize, TITLE_FONT_SIZE,
};
use crate::transform::RecallMatrix;

const PANEL_TITLE_FONT_SIZE: f64 = 18.0;
const COLOR_RAMP_STEPS: usize = 21;

static GRID_OUTERMOST_OFFSET: usize = 6;
// room for the figure title above the first row of panels
static TOP_OFFSET: usize = 12;
// room for the color bar on the right
static RIGHT_OFFSET: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPanel {
    pub title: String,
    pub matrix: RecallMatrix,
}

/// Several recall matrices over the same axes, laid out row by row, sharing one
/// color scale on [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    pub panels: Vec<HeatmapPanel>,
    pub panels_per_row: usize,
    pub colormap: Colormap,
    pub hole_color: String,
}

impl HeatmapGrid {
    fn panel_rows(&self) -> usize {
        self.panels.len().div_ceil(self.panels_per_row.max(1))
    }

    pub fn to_chart(&self, size: &FigureSize) -> Chart {
        let panels_per_row = self.panels_per_row.max(1);
        let num_rows = self.panel_rows();

        let available_column_space = (100 - GRID_OUTERMOST_OFFSET - RIGHT_OFFSET) as f64;
        let available_row_space = (100 - TOP_OFFSET - GRID_OUTERMOST_OFFSET) as f64;
        let column_width = available_column_space / panels_per_row as f64;
        let row_width = available_row_space / num_rows as f64;

        let ramp: Vec<Color> = self
            .colormap
            .resample(COLOR_RAMP_STEPS)
            .into_iter()
            .map(|rgb| Color::from(rgb.to_hex().as_str()))
            .collect();

        let mut chart = base_chart(&self.title, size).visual_map(
            VisualMap::new()
                .min(0)
                .max(1)
                .calculable(true)
                .right("2%")
                .top("center")
                .in_range(VisualMapChannel::new().color(ramp)),
        );

        for (index, panel) in self.panels.iter().enumerate() {
            let column_index = index % panels_per_row;
            let row_index = index / panels_per_row;

            // each panel keeps a margin for its own axis names and title
            let left = GRID_OUTERMOST_OFFSET + (column_index as f64 * column_width) as usize + 3;
            let right = RIGHT_OFFSET
                + ((panels_per_row - 1 - column_index) as f64 * column_width) as usize
                + 1;
            let top = TOP_OFFSET + (row_index as f64 * row_width) as usize + 3;
            let bottom = GRID_OUTERMOST_OFFSET
                + ((num_rows - 1 - row_index) as f64 * row_width) as usize
                + 5;

            let left_str = format!("{left}%");
            let top_str = format!("{top}%");

            chart = chart
                .title(create_title_with_offsets(
                    &panel.title,
                    &left_str,
                    &format!("{}%", top - 3),
                    size,
                ))
                .grid(
                    create_grid_with_offsets(
                        &left_str,
                        &format!("{right}%"),
                        &top_str,
                        &format!("{bottom}%"),
                    )
                    .show(true)
                    .background_color(self.hole_color.as_str()),
                )
                .x_axis(
                    Axis::new()
                        .type_(AxisType::Category)
                        .grid_index(index as i32)
                        .data(self.columns.clone())
                        .name(self.x_label.as_str())
                        .name_location(NameLocation::Middle)
                        .name_gap(size.font_px(TITLE_FONT_SIZE) * 2)
                        .name_text_style(axis_name_style(size))
                        .axis_label(tick_labels(size)),
                )
                .y_axis(
                    Axis::new()
                        .type_(AxisType::Category)
                        .grid_index(index as i32)
                        .data(self.rows.clone())
                        .inverse(true)
                        .name(self.y_label.as_str())
                        .name_location(NameLocation::Middle)
                        .name_gap(size.font_px(TITLE_FONT_SIZE) * 2)
                        .name_text_style(axis_name_style(size))
                        .axis_label(tick_labels(size)),
                )
                .series(
                    Heatmap::new()
                        .name(panel.title.as_str())
                        .x_axis_index(index as i32)
                        .y_axis_index(index as i32)
                        .data(heatmap_cells(&panel.matrix)),
                );
        }

        chart
    }
}

// holes are left out so the grid background shows through
fn heatmap_cells(matrix: &RecallMatrix) -> Vec<Vec<DataPoint>> {
    matrix
        .present_cells()
        .map(|(column, row, value)| {
            vec![
                DataPoint::from(column as i64),
                DataPoint::from(row as i64),
                DataPoint::from(value),
            ]
        })
        .collect()
}

fn create_grid_with_offsets(
    left_offset_str: &str,
    right_offset_str: &str,
    top_offset_str: &str,
    bottom_offset_str: &str,
) -> Grid {
    Grid::new()
        .left(left_offset_str)
        .right(right_offset_str)
        .top(top_offset_str)
        .bottom(bottom_offset_str)
}

fn create_title_with_offsets(
    text: &str,
    left_offset_str: &str,
    top_offset_str: &str,
    size: &FigureSize,
) -> Title {
    Title::new()
        .text(text)
        .left(left_offset_str)
        .top(top_offset_str)
        .text_style(
            TextStyle::new()
                .font_size(size.font_px(PANEL_TITLE_FONT_SIZE))
                .color("black"),
        )
}

// Chart layouts and the Chart.js configuration built from them
use serde::{Deserialize, Serialize, Serializer};

use super::display::DisplayConstants;
use super::series::{format_timestamp, Point, SeriesKind};

const GRID_COLOR: &str = "rgb(234, 236, 244)";

/// Built-in chart sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// A single reachable-count chart over the whole feed
    Simple,
    /// Reachability, reachability breakdown and QUIC v2 charts over a
    /// trailing window
    #[default]
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLayout {
    pub kind: SeriesKind,
    pub label: String,
    pub color: String,
}

impl SeriesLayout {
    pub fn new(kind: SeriesKind, color: &str) -> Self {
        Self {
            kind,
            label: kind.default_label().to_string(),
            color: color.to_string(),
        }
    }
}

/// What goes on one canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub canvas: String,
    pub title: String,
    pub stacked: bool,
    pub truncate: bool,
    pub series: Vec<SeriesLayout>,
}

impl ChartLayout {
    pub fn variant(variant: Variant) -> Vec<ChartLayout> {
        match variant {
            Variant::Simple => vec![ChartLayout {
                canvas: "canvasReachable".to_string(),
                title: "Reachable".to_string(),
                stacked: false,
                truncate: false,
                series: vec![SeriesLayout::new(SeriesKind::Reachable, "#11a718")],
            }],
            Variant::Full => vec![
                ChartLayout {
                    canvas: "canvasReachable".to_string(),
                    title: "Reachability".to_string(),
                    stacked: true,
                    truncate: true,
                    series: vec![
                        SeriesLayout::new(SeriesKind::Reachable, "#11a718"),
                        SeriesLayout::new(SeriesKind::Unreachable, "#e74a3b"),
                    ],
                },
                ChartLayout {
                    canvas: "canvasReachBreakdown".to_string(),
                    title: "Reachability Breakdown".to_string(),
                    stacked: true,
                    truncate: true,
                    series: vec![
                        SeriesLayout::new(SeriesKind::GoodReachable, "#11a718"),
                        SeriesLayout::new(SeriesKind::TooMuch, "#f6c23e"),
                        SeriesLayout::new(SeriesKind::MultiRtt, "#36b9cc"),
                    ],
                },
                ChartLayout {
                    canvas: "canvasQuicV2".to_string(),
                    title: "QUIC v2".to_string(),
                    stacked: false,
                    truncate: true,
                    series: vec![SeriesLayout::new(SeriesKind::QuicV2, "#4e73df")],
                },
            ],
        }
    }
}

/// How a dataset's area is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    None,
    Origin,
    Previous,
}

impl Serialize for FillMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FillMode::None => serializer.serialize_bool(false),
            FillMode::Origin => serializer.serialize_str("origin"),
            FillMode::Previous => serializer.serialize_str("-1"),
        }
    }
}

/// One chart value; `label` is the tooltip title for this x value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: f64,
    pub label: String,
}

impl From<&Point> for ChartPoint {
    fn from(point: &Point) -> Self {
        Self {
            x: point.time_ms,
            y: point.value,
            label: format_timestamp(point.time_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub point_radius: f64,
    pub line_tension: f64,
    pub fill: FillMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub data: Vec<ChartPoint>,
}

impl DatasetDescriptor {
    pub fn new(
        series: &SeriesLayout,
        points: &[Point],
        display: &DisplayConstants,
        fill: FillMode,
        stack: Option<String>,
    ) -> Self {
        Self {
            kind: "line",
            label: series.label.clone(),
            background_color: series.color.clone(),
            border_color: series.color.clone(),
            border_width: display.line_width,
            point_radius: display.point_radius,
            line_tension: 0.0,
            fill,
            stack,
            data: points.iter().map(ChartPoint::from).collect(),
        }
    }
}

/// Keep at most `window` of the most recent points. A zero window keeps all.
pub fn truncate_trailing(points: &[Point], window: usize) -> &[Point] {
    if window == 0 || points.len() <= window {
        points
    } else {
        &points[points.len() - window..]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartJsConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartJsData,
    pub options: ChartJsOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartJsData {
    pub datasets: Vec<DatasetDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartJsOptions {
    pub maintain_aspect_ratio: bool,
    pub scales: Scales,
    pub legend: Legend,
    pub tooltips: Tooltips,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    pub x_axes: Vec<Axis>,
    pub y_axes: Vec<Axis>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<bool>,
    pub stacked: bool,
    pub grid_lines: GridLines,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLines {
    pub display: bool,
    pub draw_border: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_line_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub border_dash: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zero_line_border_dash: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub display: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltips {
    pub background_color: &'static str,
    pub body_font_color: &'static str,
    pub title_margin_bottom: u32,
    pub title_font_color: &'static str,
    pub title_font_size: u32,
    pub border_color: &'static str,
    pub border_width: u32,
    pub x_padding: u32,
    pub y_padding: u32,
    pub mode: &'static str,
    pub intersect: bool,
}

impl ChartJsOptions {
    pub fn new(stacked: bool, show_legend: bool) -> Self {
        Self {
            maintain_aspect_ratio: false,
            scales: Scales {
                x_axes: vec![Axis {
                    kind: "linear",
                    offset: Some(true),
                    stacked: false,
                    grid_lines: GridLines {
                        display: false,
                        draw_border: false,
                        color: None,
                        zero_line_color: None,
                        border_dash: Vec::new(),
                        zero_line_border_dash: Vec::new(),
                    },
                }],
                y_axes: vec![Axis {
                    kind: "linear",
                    offset: None,
                    stacked,
                    grid_lines: GridLines {
                        display: true,
                        draw_border: false,
                        color: Some(GRID_COLOR),
                        zero_line_color: Some(GRID_COLOR),
                        border_dash: vec![2],
                        zero_line_border_dash: vec![2],
                    },
                }],
            },
            legend: Legend {
                display: show_legend,
            },
            tooltips: Tooltips {
                background_color: "rgb(255,255,255)",
                body_font_color: "#858796",
                title_margin_bottom: 10,
                title_font_color: "#6e707e",
                title_font_size: 14,
                border_color: "#dddfeb",
                border_width: 1,
                x_padding: 15,
                y_padding: 15,
                mode: "nearest",
                intersect: false,
            },
        }
    }
}

/// A finished chart: target canvas plus the configuration handed to Chart.js
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub canvas: String,
    pub title: String,
    pub config: ChartJsConfig,
}

impl ChartSpec {
    /// Assemble datasets for `layout` from already generated series, in
    /// layout order. Stacked layouts fill the first series to the origin and
    /// each later one to the series below it.
    pub fn build(layout: &ChartLayout, series: &[Vec<Point>], display: &DisplayConstants) -> Self {
        let datasets: Vec<DatasetDescriptor> = layout
            .series
            .iter()
            .zip(series)
            .enumerate()
            .map(|(i, (series_layout, points))| {
                let points = if layout.truncate {
                    truncate_trailing(points, display.max_count)
                } else {
                    points.as_slice()
                };

                let (fill, stack) = match (layout.stacked, i) {
                    (false, _) => (FillMode::None, None),
                    (true, 0) => (FillMode::Origin, Some(layout.canvas.clone())),
                    (true, _) => (FillMode::Previous, Some(layout.canvas.clone())),
                };

                DatasetDescriptor::new(series_layout, points, display, fill, stack)
            })
            .collect();

        let show_legend = datasets.len() > 1;

        Self {
            canvas: layout.canvas.clone(),
            title: layout.title.clone(),
            config: ChartJsConfig {
                kind: "line",
                data: ChartJsData { datasets },
                options: ChartJsOptions::new(layout.stacked, show_legend),
            },
        }
    }
}

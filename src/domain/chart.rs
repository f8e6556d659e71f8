// Declarative chart description consumed by the rendering layer
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<CategoryAxis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub y_axes: Vec<ValueAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacking: Option<Stacking>,
    pub data_labels: bool,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_axis: None,
            y_axes: Vec::new(),
            stacking: None,
            data_labels: false,
            series: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Column,
    Spline,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stacking {
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAxis {
    pub title: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxis {
    pub title: String,
    pub opposite: bool,
    pub stack_labels: bool,
}

impl ValueAxis {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            opposite: false,
            stack_labels: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub kind: ChartKind,
    pub name: String,
    pub y_axis: usize,
    pub data: SeriesPoints,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesPoints {
    /// One value per x-axis category; `None` renders as a gap
    Values(Vec<Option<f64>>),
    Slices(Vec<SlicePoint>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlicePoint {
    pub name: String,
    pub y: u64,
    pub sliced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_format: Option<String>,
}

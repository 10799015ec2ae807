//! Declarative chart specifications.
//!
//! A [`ChartSpec`] is the wire contract between the pipeline and the browser
//! shell: the front end maps each spec onto the plotting library without any
//! further computation. Specs are ephemeral and rebuilt per render.

pub mod builders;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Bar,
    Line,
    Markers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub kind: SeriesKind,
    pub axis: AxisSide,
    pub x: Vec<String>,
    /// `None` renders as a gap (e.g. the warm-up of a moving average).
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl ChartSeries {
    pub fn bar(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Self::new(name, SeriesKind::Bar, x, y)
    }

    pub fn line(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Self::new(name, SeriesKind::Line, x, y)
    }

    pub fn markers(name: impl Into<String>, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Self::new(name, SeriesKind::Markers, x, y)
    }

    fn new(name: impl Into<String>, kind: SeriesKind, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            kind,
            axis: AxisSide::Primary,
            x,
            y,
            color: None,
        }
    }

    pub fn on_secondary(mut self) -> Self {
        self.axis = AxisSide::Secondary;
        self
    }

    pub fn colored(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

impl AxisSpec {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            range: None,
        }
    }

    pub fn ranged(title: impl Into<String>, range: [f64; 2]) -> Self {
        Self {
            title: title.into(),
            range: Some(range),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_y_axis: Option<AxisSpec>,
    /// Stacked bars instead of grouped bars.
    pub stacked: bool,
    pub series: Vec<ChartSeries>,
}

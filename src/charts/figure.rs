//! Plotly figure documents
//!
//! Serializable subset of the Plotly.js figure schema. The browser passes
//! `data` and `layout` straight to `Plotly.newPlot`.

use serde::Serialize;

/// A complete chart: traces plus layout
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(layout: Layout) -> Self {
        Self {
            data: Vec::new(),
            layout,
        }
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }
}

/// Trace kinds used by the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scattergeo(GeoTrace),
    Bar(BarTrace),
}

/// Markers positioned on a map
#[derive(Debug, Clone, Serialize)]
pub struct GeoTrace {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub hovertext: Vec<String>,
    pub mode: String,
    pub marker: GeoMarker,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoMarker {
    pub size: Vec<u64>,
    pub sizemode: String,
    pub sizeref: f64,
    pub sizemin: f64,
    pub color: String,
}

/// A bar series; the dashboard emits one per category so each gets its own
/// color and legend entry
#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<u64>,
    pub marker: BarMarker,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarMarker {
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    pub margin: Margin,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoLayout {
    pub projection: Projection,
    pub showcountries: bool,
    pub showland: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title::new(text),
            categoryorder: None,
            categoryarray: None,
        }
    }

    /// Pin category order so bars render in the order they were emitted
    pub fn ordered(mut self, categories: Vec<String>) -> Self {
        self.categoryorder = Some("array".to_string());
        self.categoryarray = Some(categories);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: 40,
            r: 20,
            t: 40,
            b: 40,
        }
    }
}

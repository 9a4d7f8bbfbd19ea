//! Sightings world map

use super::figure::{Figure, GeoLayout, GeoMarker, GeoTrace, Layout, Projection, Title, Trace};
use crate::sightings::SightingRecord;

/// Diameter in pixels of the marker for the largest count
pub const MAX_MARKER_SIZE: f64 = 20.0;

/// Smallest marker diameter so tiny counts stay visible
const MIN_MARKER_SIZE: f64 = 2.0;

const MARKER_COLOR: &str = "red";

/// Build the scatter-geo figure for one month's records
///
/// Marker area scales with the sighting count; the largest count gets a
/// `MAX_MARKER_SIZE` diameter. No records yields an empty trace.
pub fn sightings_map(month: &str, records: &[&SightingRecord]) -> Figure {
    let max = records.iter().map(|r| r.sightings).max().unwrap_or(0);

    let trace = GeoTrace {
        lat: records.iter().map(|r| r.latitude).collect(),
        lon: records.iter().map(|r| r.longitude).collect(),
        hovertext: records.iter().map(|r| r.country.clone()).collect(),
        mode: "markers".to_string(),
        marker: GeoMarker {
            size: records.iter().map(|r| r.sightings).collect(),
            sizemode: "area".to_string(),
            sizeref: area_sizeref(max),
            sizemin: MIN_MARKER_SIZE,
            color: MARKER_COLOR.to_string(),
        },
        hovertemplate: "<b>%{hovertext}</b><br>Sightings: %{marker.size}<extra></extra>"
            .to_string(),
    };

    let layout = Layout {
        title: Some(Title::new(format!("UAP Sightings Map - {}", month))),
        geo: Some(GeoLayout {
            projection: Projection {
                kind: "natural earth".to_string(),
            },
            showcountries: true,
            showland: true,
        }),
        ..Default::default()
    };

    Figure::new(layout).trace(Trace::Scattergeo(trace))
}

/// Plotly's area sizing reference: a value of `max` renders at
/// `MAX_MARKER_SIZE` px diameter
fn area_sizeref(max: u64) -> f64 {
    if max == 0 {
        return 1.0;
    }
    2.0 * max as f64 / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
}

/// Rendered diameter for `value` under the sizing used by `sightings_map`
pub fn marker_diameter(value: u64, max: u64) -> f64 {
    if value == 0 || max == 0 {
        return MIN_MARKER_SIZE;
    }
    // plotly area mode draws 2 * sqrt(size / 2 / sizeref)
    let diameter = 2.0 * (value as f64 / 2.0 / area_sizeref(max)).sqrt();
    diameter.max(MIN_MARKER_SIZE)
}

//! Sightings ranking bar chart

use super::figure::{Axis, BarMarker, BarTrace, Figure, Layout, Legend, Title, Trace};
use super::palette;
use crate::sightings::SightingRecord;

/// Order records by sighting count, highest first
///
/// The sort is stable, so equal counts keep their dataset order.
pub fn rank_by_sightings<'a>(records: &[&'a SightingRecord]) -> Vec<&'a SightingRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.sightings.cmp(&a.sightings));
    ranked
}

/// Build the per-country bar chart for one month
pub fn sightings_ranking(month: &str, records: &[&SightingRecord]) -> Figure {
    let ranked = rank_by_sightings(records);

    let categories: Vec<String> = ranked.iter().map(|r| r.country.clone()).collect();

    let layout = Layout {
        title: Some(Title::new(format!("UAP Sightings by Country - {}", month))),
        xaxis: Some(Axis::titled("Country").ordered(categories)),
        yaxis: Some(Axis::titled("Sightings")),
        legend: Some(Legend {
            title: Title::new("Country"),
        }),
        barmode: Some("relative".to_string()),
        ..Default::default()
    };

    ranked
        .iter()
        .enumerate()
        .fold(Figure::new(layout), |fig, (idx, record)| {
            fig.trace(Trace::Bar(BarTrace {
                name: record.country.clone(),
                x: vec![record.country.clone()],
                y: vec![record.sightings],
                marker: BarMarker {
                    color: palette::cycle(&palette::SET1, idx),
                },
            }))
        })
}

//! Visits-by-country bar chart

use super::figure::{Axis, BarMarker, BarTrace, Figure, Layout, Title, Trace};
use super::palette;
use crate::session::VisitRow;

/// Build the visit count chart from rows already ranked by count
pub fn visits_by_country(rows: &[VisitRow]) -> Figure {
    let layout = Layout {
        title: Some(Title::new("Country Visit Count")),
        xaxis: Some(
            Axis::titled("Country").ordered(rows.iter().map(|r| r.country.clone()).collect()),
        ),
        yaxis: Some(Axis::titled("Visits")),
        ..Default::default()
    };

    rows.iter()
        .enumerate()
        .fold(Figure::new(layout), |fig, (idx, row)| {
            fig.trace(Trace::Bar(BarTrace {
                name: row.country.clone(),
                x: vec![row.country.clone()],
                y: vec![row.visits],
                marker: BarMarker {
                    color: palette::cycle(&palette::PLOTLY, idx),
                },
            }))
        })
}

//! Qualitative color palettes

/// ColorBrewer Set1, used for the sightings ranking
pub const SET1: [&str; 9] = [
    "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#FFFF33", "#A65628", "#F781BF",
    "#999999",
];

/// Plotly's default qualitative sequence, used for visit counts
pub const PLOTLY: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Color for the `index`-th category, cycling through `palette`
pub fn cycle(palette: &[&str], index: usize) -> String {
    palette[index % palette.len()].to_string()
}

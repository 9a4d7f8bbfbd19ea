//! Chart Rendering
//!
//! Builds Plotly figure documents on the server so ordering, sizing and
//! coloring rules live in one place. Every renderer accepts an empty input
//! and returns a valid (empty) figure.

pub mod figure;
pub mod geo_map;
pub mod palette;
pub mod ranking;
pub mod visits;

pub use figure::{Figure, Layout, Trace};
pub use geo_map::sightings_map;
pub use ranking::{rank_by_sightings, sightings_ranking};
pub use visits::visits_by_country;

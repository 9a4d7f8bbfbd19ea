//! Dashboard Page
//!
//! - GET / - Single-page dashboard
//!
//! The page is a static shell: the month selector and video panels are
//! rendered here, charts are fetched from the JSON API and drawn with
//! Plotly.js. A month change refetches only `/api/v1/charts`; page load
//! posts once to `/api/v1/visit`.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::routes::videos::video_response;
use crate::api::state::AppState;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// GET /
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let dataset = state.dataset().await;
    let months = dataset.months();
    let videos: Vec<_> = state.videos.iter().map(video_response).collect();

    let options: String = months
        .iter()
        .enumerate()
        .map(|(idx, month)| {
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                escape_html(month),
                if idx == 0 { " selected" } else { "" }
            )
        })
        .collect();

    let video_panels: String = videos
        .iter()
        .map(|v| {
            format!(
                r#"<section class="video">
  <h2>{}</h2>
  <iframe src="{}" allow="accelerometer; encrypted-media; picture-in-picture" allowfullscreen></iframe>
</section>
"#,
                escape_html(&v.title),
                escape_html(&v.embed_url)
            )
        })
        .collect();

    Html(render_page(&options, &video_panels))
}

fn render_page(month_options: &str, video_panels: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>UAP Sightings by Month</title>
<script src="{plotly}"></script>
<style>
  body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; background: #0e1117; color: #fafafa; }}
  main {{ max-width: 1400px; margin: 0 auto; padding: 2rem; }}
  h1 {{ font-size: 2.2rem; }}
  select {{ font-size: 1rem; padding: .4rem .6rem; border-radius: 6px; }}
  .chart {{ width: 100%; min-height: 450px; }}
  .video iframe {{ width: 100%; aspect-ratio: 16 / 9; border: 0; }}
  table {{ border-collapse: collapse; }}
  th, td {{ padding: .3rem .8rem; border-bottom: 1px solid #333; text-align: left; }}
  code {{ background: #262730; padding: .1rem .3rem; border-radius: 4px; }}
  .muted {{ color: #999; }}
</style>
</head>
<body>
<main>
<h1>🛸 Monthly UAP Sightings Around the World</h1>

<label for="month">Select Month</label>
<select id="month">{options}</select>

<h2 id="map-title">🌍 UAP Sightings Map</h2>
<div id="map" class="chart"></div>

<h2 id="bar-title">📊 UAP Sightings by Country</h2>
<div id="ranking" class="chart"></div>

{videos}
<h1>🌐 Live Country Visitor Tracker</h1>

<h2>👤 Current Visitor Info</h2>
<p><strong>IP Address:</strong> <code id="visitor-ip">…</code></p>
<p><strong>Country:</strong> <code id="visitor-country">…</code></p>
<p><strong>City:</strong> <code id="visitor-city">…</code></p>

<h2>📊 Total Visits by Country (Current Session)</h2>
<div id="visits" class="chart"></div>

<details>
  <summary>🔍 Show Raw Data</summary>
  <table>
    <thead><tr><th>Country</th><th>Visits</th></tr></thead>
    <tbody id="visits-table"></tbody>
  </table>
</details>
</main>

<script>
const plotConfig = {{ responsive: true, displaylogo: false }};

async function loadCharts(month) {{
  const res = await fetch('/api/v1/charts?month=' + encodeURIComponent(month));
  if (!res.ok) return;
  const body = await res.json();
  document.getElementById('map-title').textContent = '🌍 UAP Sightings Map - ' + body.month;
  document.getElementById('bar-title').textContent = '📊 UAP Sightings by Country - ' + body.month;
  Plotly.react('map', body.map.data, body.map.layout, plotConfig);
  Plotly.react('ranking', body.ranking.data, body.ranking.layout, plotConfig);
}}

async function recordVisit() {{
  const res = await fetch('/api/v1/visit', {{ method: 'POST', credentials: 'same-origin' }});
  if (!res.ok) return;
  const body = await res.json();
  document.getElementById('visitor-ip').textContent = body.visitor.ip;
  document.getElementById('visitor-country').textContent = body.visitor.country;
  document.getElementById('visitor-city').textContent = body.visitor.city;
  Plotly.react('visits', body.chart.data, body.chart.layout, plotConfig);

  const rows = document.getElementById('visits-table');
  rows.replaceChildren(...body.session.rows.map(r => {{
    const tr = document.createElement('tr');
    for (const value of [r.country, r.visits]) {{
      const td = document.createElement('td');
      td.textContent = value;
      tr.appendChild(td);
    }}
    return tr;
  }}));
}}

const select = document.getElementById('month');
select.addEventListener('change', () => loadCharts(select.value));
if (select.value) loadCharts(select.value);
recordVisit();
</script>
</body>
</html>
"##,
        plotly = PLOTLY_CDN,
        options = month_options,
        videos = video_panels,
    )
}

/// Escape text for HTML element content and attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

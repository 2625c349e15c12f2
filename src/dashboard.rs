//! Dashboard projection of a comparison: metric cards, chart series and
//! recommendations, plus a static page that embeds them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use crate::{
    BenchDeltaError,
    categorizer::title_case,
    comparator::{Classification, Comparison, ComparisonPolicy, delta_pct},
    recommend::{MetricSample, Recommendation, Recommender},
};

pub const DASHBOARD_FILE: &str = "performance-dashboard.html";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Faster,
    Slower,
    Unknown,
}

impl Direction {
    fn from_change(change_pct: Option<f64>) -> Self {
        match change_pct {
            Some(change) if change < 0.0 => Direction::Faster,
            Some(_) => Direction::Slower,
            None => Direction::Unknown,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Faster => "↓",
            Direction::Slower => "↑",
            Direction::Unknown => "•",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Direction::Faster => "positive",
            Direction::Slower => "negative",
            Direction::Unknown => "neutral",
        }
    }
}

/// One metric card. `current` and `baseline` are expressed in `unit`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardMetric {
    pub name: String,
    pub title: String,
    pub current: f64,
    pub baseline: f64,
    pub unit: String,
    pub change_pct: Option<f64>,
    pub classification: Classification,
    pub direction: Direction,
}

impl DashboardMetric {
    pub fn new(
        name: impl Into<String>,
        current: f64,
        baseline: f64,
        unit: impl Into<String>,
        policy: &ComparisonPolicy,
    ) -> Self {
        let name = name.into();
        let change_pct = delta_pct(baseline, current);
        Self {
            title: title_case(&name),
            name,
            current,
            baseline,
            unit: unit.into(),
            change_pct,
            classification: policy.classify(Some(baseline), Some(current)),
            direction: Direction::from_change(change_pct),
        }
    }

    pub fn change_text(&self) -> String {
        match self.change_pct {
            Some(change) => format!(
                "{} {:.1}% from baseline",
                self.direction.arrow(),
                change.abs()
            ),
            None => "N/A from baseline".to_string(),
        }
    }

    fn sample(&self) -> MetricSample {
        let scale = unit_secs(&self.unit);
        MetricSample {
            name: self.name.clone(),
            current: self.current * scale,
            baseline: Some(self.baseline * scale),
        }
    }
}

/// Seconds per display unit; unknown units are treated as seconds.
pub fn unit_secs(unit: &str) -> f64 {
    match unit {
        "ns" => 1e-9,
        "µs" | "us" => 1e-6,
        "ms" => 1e-3,
        _ => 1.0,
    }
}

/// Largest unit in which `secs` is at least one.
pub fn display_unit(secs: f64) -> &'static str {
    if secs < 1e-6 {
        "ns"
    } else if secs < 1e-3 {
        "µs"
    } else if secs < 1.0 {
        "ms"
    } else {
        "s"
    }
}

/// Parallel arrays for a bar chart (current vs baseline) and a doughnut
/// chart (current only).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub current: Vec<f64>,
    pub baseline: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardData {
    pub generated: String,
    pub metrics: Vec<DashboardMetric>,
    pub chart: ChartSeries,
    pub recommendations: Vec<Recommendation>,
}

impl DashboardData {
    pub fn from_metrics(
        metrics: Vec<DashboardMetric>,
        recommender: &Recommender,
        generated: impl Into<String>,
    ) -> Self {
        let chart = ChartSeries {
            labels: metrics.iter().map(|m| m.name.clone()).collect(),
            current: metrics.iter().map(|m| m.current).collect(),
            baseline: metrics.iter().map(|m| m.baseline).collect(),
        };
        let samples: Vec<MetricSample> = metrics.iter().map(DashboardMetric::sample).collect();
        Self {
            generated: generated.into(),
            recommendations: recommender.evaluate(&samples),
            metrics,
            chart,
        }
    }

    /// One card per identifier measured in both runs, in identifier order.
    pub fn from_comparison(
        comparison: &Comparison,
        policy: &ComparisonPolicy,
        recommender: &Recommender,
        generated: impl Into<String>,
    ) -> Self {
        let metrics = comparison
            .entries
            .iter()
            .filter_map(|entry| {
                let (baseline, current) = (entry.baseline?, entry.current?);
                let unit = display_unit(baseline.max(current));
                let scale = unit_secs(unit);
                Some(DashboardMetric::new(
                    entry.id.clone(),
                    current / scale,
                    baseline / scale,
                    unit,
                    policy,
                ))
            })
            .collect();
        Self::from_metrics(metrics, recommender, generated)
    }

    /// The fixed illustrative metric set used when no live runs are supplied.
    pub fn illustrative(
        policy: &ComparisonPolicy,
        recommender: &Recommender,
        generated: impl Into<String>,
    ) -> Self {
        let metrics = [
            ("sequential_writes", 572.98, 600.0, "µs"),
            ("random_reads", 125.5, 120.0, "µs"),
            ("full_scan", 2500.0, 2600.0, "µs"),
            ("btree_search", 85.2, 90.0, "ns"),
            ("page_allocation", 450.0, 440.0, "ns"),
        ]
        .into_iter()
        .map(|(name, current, baseline, unit)| {
            DashboardMetric::new(name, current, baseline, unit, policy)
        })
        .collect();
        Self::from_metrics(metrics, recommender, generated)
    }

    pub fn to_json(&self) -> Result<String, BenchDeltaError> {
        serde_json::to_string_pretty(self).map_err(BenchDeltaError::from)
    }

    pub fn render_html(&self) -> Result<String, BenchDeltaError> {
        let cards: Vec<String> = self
            .metrics
            .iter()
            .map(|m| {
                format!(
                    concat!(
                        "<div class=\"metric-card\">",
                        "<div class=\"metric-title\">{}</div>",
                        "<div class=\"metric-value\">{:.1} {}</div>",
                        "<div class=\"metric-change {}\">{}</div>",
                        "</div>"
                    ),
                    escape_html(&m.title),
                    m.current,
                    escape_html(&m.unit),
                    m.direction.css_class(),
                    m.change_text()
                )
            })
            .collect();
        let recommendations: Vec<String> = self
            .recommendations
            .iter()
            .map(|r| match &r.subject {
                Some(subject) => format!(
                    "<li><strong>{}:</strong> {}</li>",
                    escape_html(subject),
                    escape_html(&r.advice)
                ),
                None => format!("<li>{}</li>", escape_html(&r.advice)),
            })
            .collect();
        // `</` inside the embedded JSON would close the script element.
        let chart_json = serde_json::to_string(&self.chart)?.replace("</", "<\\/");
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Performance Dashboard</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
<h1>Performance Dashboard</h1>
<p>Last updated: {generated}</p>
<div class="metric-grid">
{cards}
</div>
<h2>Performance Trends</h2>
<canvas id="performanceChart"></canvas>
<h2>Operation Breakdown</h2>
<canvas id="breakdownChart"></canvas>
<div class="recommendations">
<h2>Performance Recommendations</h2>
<ul>
{recommendations}
</ul>
</div>
<script>
const chart = {chart_json};
new Chart(document.getElementById('performanceChart'), {{
  type: 'bar',
  data: {{
    labels: chart.labels,
    datasets: [
      {{ label: 'Current', data: chart.current }},
      {{ label: 'Baseline', data: chart.baseline }}
    ]
  }},
  options: {{ responsive: true, scales: {{ y: {{ beginAtZero: true }} }} }}
}});
new Chart(document.getElementById('breakdownChart'), {{
  type: 'doughnut',
  data: {{ labels: chart.labels, datasets: [{{ data: chart.current }}] }},
  options: {{ responsive: true, plugins: {{ legend: {{ position: 'right' }} }} }}
}});
</script>
</body>
</html>
"#,
            generated = escape_html(&self.generated),
            cards = cards.join("\n"),
            recommendations = recommendations.join("\n"),
        ))
    }

    /// Writes the page to `<out_dir>/performance-dashboard.html`, creating
    /// the directory when absent.
    pub fn write_page(&self, out_dir: &Path) -> Result<PathBuf, BenchDeltaError> {
        fs::create_dir_all(out_dir)
            .map_err(|e| BenchDeltaError::io(format!("{}: {e}", out_dir.display())))?;
        let path = out_dir.join(DASHBOARD_FILE);
        fs::write(&path, self.render_html()?)
            .map_err(|e| BenchDeltaError::io(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), metrics = self.metrics.len(), "wrote dashboard");
        Ok(path)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

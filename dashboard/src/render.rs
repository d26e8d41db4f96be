//! HTML presentation of a snapshot. Pure: same result, same page.

use askama::Template;
use vram_view_shared::{AggregationResult, ResourceRecord};

use crate::config::DashboardConfig;

#[derive(Template)]
#[template(path = "index.html")]
struct DashboardTemplate<'a> {
    records: &'a [ResourceRecord],
    diagnostic: Option<&'a str>,
    namespace: &'a str,
    pod_name: &'a str,
    node_label: &'a str,
    edit_url: Option<&'a str>,
    total_vram: String,
    used_vram: String,
    remaining_vram: String,
    used_pct: String,
    bar_color: &'static str,
}

fn bar_color(pct: f64) -> &'static str {
    if pct > 90.0 {
        "bg-danger"
    } else if pct > 70.0 {
        "bg-warning"
    } else {
        "bg-success"
    }
}

pub fn render_dashboard(
    result: &AggregationResult,
    config: &DashboardConfig,
) -> Result<String, askama::Error> {
    let budget = &result.budget;

    // Failed snapshots carry a zeroed budget; the frame still shows the node's size.
    let (used_vram, remaining_vram) = if result.diagnostic.is_some() {
        (String::new(), String::new())
    } else {
        (
            format!("{:.2}", budget.used_capacity),
            format!("{:.2}", budget.remaining_capacity),
        )
    };

    DashboardTemplate {
        records: &result.records,
        diagnostic: result.diagnostic.as_deref(),
        namespace: &result.namespace,
        pod_name: &result.source_identity,
        node_label: &config.node_label,
        edit_url: config.edit_url.as_deref(),
        total_vram: format!("{:.1}", config.total_vram_gib),
        used_vram,
        remaining_vram,
        used_pct: format!("{:.2}", budget.used_percentage.clamp(0.0, 100.0)),
        bar_color: bar_color(budget.used_percentage),
    }
    .render()
}

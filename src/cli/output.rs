//! Output formatting helpers for CLI commands

use crate::dashboard::{Dashboard, FeedStatus};
use crate::feed::{MetricsSnapshot, TimelineEvent};
use crate::timeline::group_by_train;
use crate::view::{ids, EMPTY_FIELD};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::time::Instant;

/// Cells in a full-width text bar
const BAR_CELLS: usize = 30;

/// Result of a one-shot poll, for `tcc snapshot`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotView {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEvent>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Render a CSS-style width (`"66.67%"`) as a bar of `cells` characters.
pub fn text_bar(width: Option<&str>, cells: usize) -> String {
    let fraction = width
        .and_then(|w| w.trim_end_matches('%').parse::<f64>().ok())
        .map(|pct| (pct / 100.0).clamp(0.0, 1.0))
        .unwrap_or(0.0);
    let filled = (fraction * cells as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn status_line(name: &str, status: &FeedStatus) -> String {
    match status {
        FeedStatus::Pending => format!("{} {}", name, "pending".yellow()),
        FeedStatus::Ok { at } => format!("{} {} {}", name, "ok".green(), at.format("%H:%M:%S")),
        FeedStatus::Failed { at, error } => format!(
            "{} {} {} ({})",
            name,
            "stale".red(),
            at.format("%H:%M:%S"),
            error
        ),
    }
}

fn field<'a>(dashboard: &'a Dashboard, id: &str) -> &'a str {
    dashboard.surface().text(id).unwrap_or(EMPTY_FIELD)
}

fn kpi_table(dashboard: &Dashboard) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Active Trains",
        "Network Efficiency",
        "Avg Delay",
        "Active Alerts",
    ]);
    table.add_row(vec![
        Cell::new(field(dashboard, ids::ACTIVE_TRAINS)),
        Cell::new(field(dashboard, ids::NETWORK_EFFICIENCY)),
        Cell::new(field(dashboard, ids::AVG_DELAY)),
        Cell::new(field(dashboard, ids::ACTIVE_ALERTS_COUNT)),
    ]);
    table.to_string()
}

fn alerts_block(dashboard: &Dashboard, out: &mut Vec<String>) {
    out.push(field(dashboard, ids::ALERTS_TITLE).bold().to_string());
    if dashboard.alerts().is_empty() {
        out.push(format!("  {}", dashboard.alert_lines().join("").dimmed()));
    } else {
        for line in dashboard.alert_lines() {
            out.push(format!("  {}", line.yellow()));
        }
    }
}

fn performance_bars(dashboard: &Dashboard, out: &mut Vec<String>) {
    let rows = [
        ("On-Time", ids::ON_TIME_METRIC, ids::ON_TIME_BAR),
        ("Avg Speed", ids::AVG_SPEED_METRIC, ids::AVG_SPEED_BAR),
        ("Efficiency", ids::EFFICIENCY_METRIC, ids::EFFICIENCY_BAR),
    ];
    for (label, metric, bar) in rows {
        out.push(format!(
            "  {:<11}{} {}",
            label,
            text_bar(dashboard.surface().width(bar), BAR_CELLS).cyan(),
            field(dashboard, metric)
        ));
    }
}

/// Render the whole dashboard as terminal text.
pub fn render_dashboard(dashboard: &Dashboard, now: Instant, width: usize) -> String {
    let surface = dashboard.surface();
    let mut out = Vec::new();

    out.push("Traffic Control Center".bold().to_string());

    if !surface.sidebar_hidden() {
        let nav = surface
            .nav_items()
            .iter()
            .zip('1'..='9')
            .map(|(item, key)| {
                let label = format!("[{}] {}", key, item.label);
                if item.active {
                    label.reversed().to_string()
                } else {
                    label
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push(nav);
    }

    out.push(format!(
        "{}   {}",
        status_line("metrics", dashboard.metrics_status()),
        status_line("timeline", dashboard.timeline_status())
    ));
    out.push(String::new());

    match surface.visible_panel() {
        Some(panel) => {
            out.push(panel.title.bold().underline().to_string());
            match panel.id.as_str() {
                ids::CONTROL_CENTER => {
                    out.push(kpi_table(dashboard));
                    alerts_block(dashboard, &mut out);
                }
                ids::TIMELINE => match dashboard.chart().current() {
                    Some(chart) => out.extend(chart.draw(width.saturating_sub(12))),
                    None => out.push("(waiting for timeline)".dimmed().to_string()),
                },
                ids::ANALYTICS => {
                    performance_bars(dashboard, &mut out);
                    let insights = "AI Insights";
                    if surface.has_insights() && surface.is_highlighted(now) {
                        out.push(format!("  {}", insights.black().on_yellow()));
                    } else if surface.has_insights() {
                        out.push(format!("  {}", insights));
                    }
                }
                _ => {
                    out.push(format!("  Alert policy: {:?}", dashboard.alert_policy()));
                    out.push(format!("  Alert capacity: {}", dashboard.alerts().capacity()));
                }
            }
        }
        None => out.push("(no panel visible)".dimmed().to_string()),
    }

    out.push(String::new());
    out.push(
        "1-4 or panel name: navigate  i: insights  s: sidebar  q: quit"
            .dimmed()
            .to_string(),
    );
    out.join("\n")
}

/// Format one metrics snapshot as a table
pub fn format_metrics_table(snapshot: &MetricsSnapshot) -> String {
    use crate::dashboard::kpi::{format_minutes, format_percent, format_speed};

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);

    let rows = [
        ("Active Trains", snapshot.active_trains.to_string()),
        ("Network Efficiency", format_percent(snapshot.efficiency)),
        ("Avg Delay", format_minutes(snapshot.avg_delay)),
        ("On-Time", format_percent(snapshot.on_time)),
        ("Avg Speed", format_speed(snapshot.avg_speed)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    let mut out = table.to_string();
    out.push_str(&format!("\nActive Alerts ({})", snapshot.alerts.len()));
    for alert in &snapshot.alerts {
        out.push_str(&format!("\n  ⚠️ {}", alert.yellow()));
    }
    out
}

/// Format timeline events as a table, one row per occupied block
pub fn format_timeline_table(events: &[TimelineEvent]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Train", "Occupancy"]);

    for series in group_by_train(events) {
        let tooltips = series
            .segments
            .iter()
            .map(|seg| seg.tooltip())
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![Cell::new(&series.train), Cell::new(tooltips)]);
    }

    table.to_string()
}

/// Format a snapshot as pretty JSON
pub fn format_snapshot_json(view: &SnapshotView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}

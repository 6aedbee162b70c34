//! Snapshot command implementation

use crate::cli::output::{
    format_metrics_table, format_snapshot_json, format_timeline_table, SnapshotView,
};
use crate::cli::{load_config_with_overrides, SnapshotArgs};
use crate::feed::{self, DataSource};
use crate::logging::init_tracing;

/// Poll both endpoints once.
///
/// A failed endpoint is reported in `errors`; the other part is still returned.
pub async fn collect_snapshot(source: &dyn DataSource) -> SnapshotView {
    let (metrics, timeline) = tokio::join!(source.fetch_metrics(), source.fetch_timeline());
    let mut view = SnapshotView {
        source: source.name().to_string(),
        ..SnapshotView::default()
    };

    match metrics {
        Ok(m) => view.metrics = Some(m),
        Err(e) => {
            tracing::warn!(error = %e, "Error loading metrics");
            view.errors.push(format!("metrics: {}", e));
        }
    }
    match timeline {
        Ok(t) => view.timeline = Some(t),
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching timeline");
            view.errors.push(format!("timeline: {}", e));
        }
    }

    view
}

/// Handle `tcc snapshot`, returning the text to print.
pub async fn handle_snapshot(args: &SnapshotArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.source)?;
    init_tracing(&config.logging)?;
    let source = feed::from_config(&config.source)?;
    let view = collect_snapshot(source.as_ref()).await;

    if view.metrics.is_none() && view.timeline.is_none() {
        return Err(format!(
            "No data from {}: {}",
            config.source.base_url,
            view.errors.join("; ")
        )
        .into());
    }

    if args.json {
        return Ok(format_snapshot_json(&view)?);
    }

    let mut out = Vec::new();
    if let Some(metrics) = &view.metrics {
        out.push(format_metrics_table(metrics));
    }
    if let Some(timeline) = &view.timeline {
        if timeline.is_empty() {
            out.push("No timeline data".to_string());
        } else {
            out.push(format_timeline_table(timeline));
        }
    }
    for error in &view.errors {
        out.push(format!("Warning: {}", error));
    }
    Ok(out.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::RandomSource;

    #[tokio::test]
    async fn test_collect_snapshot_random_source() {
        let view = collect_snapshot(&RandomSource::new()).await;
        assert_eq!(view.source, "random");
        assert!(view.metrics.is_some());
        assert_eq!(view.timeline, Some(Vec::new()));
        assert!(view.errors.is_empty());
    }
}

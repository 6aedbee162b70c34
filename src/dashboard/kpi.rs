//! KPI formatting and the snapshot-to-surface write.

use crate::feed::MetricsSnapshot;
use crate::view::{ids, Surface};

/// Speed that fills the speed bar completely, km/h
pub const MAX_SPEED_KMH: f64 = 120.0;

/// Round to two decimals and print without trailing zeros (`66.67`, `90`).
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

pub fn format_minutes(value: f64) -> String {
    format!("{} min", format_number(value))
}

pub fn format_speed(value: f64) -> String {
    format!("{} km/h", format_number(value))
}

/// Width of the speed bar as a percentage of [`MAX_SPEED_KMH`].
pub fn speed_bar_width(avg_speed: f64) -> String {
    format_percent(avg_speed / MAX_SPEED_KMH * 100.0)
}

/// Overwrite every KPI field and bar from `snapshot`.
///
/// Fields missing from the template are skipped; nothing is merged with the
/// previous values.
pub fn write_snapshot(surface: &mut Surface, snapshot: &MetricsSnapshot) {
    let writes = [
        (ids::ACTIVE_TRAINS, snapshot.active_trains.to_string()),
        (ids::NETWORK_EFFICIENCY, format_percent(snapshot.efficiency)),
        (ids::AVG_DELAY, format_minutes(snapshot.avg_delay)),
        (ids::ON_TIME_METRIC, format_percent(snapshot.on_time)),
        (ids::AVG_SPEED_METRIC, format_speed(snapshot.avg_speed)),
        (ids::EFFICIENCY_METRIC, format_percent(snapshot.efficiency)),
    ];
    for (id, value) in writes {
        if !surface.set_text(id, value) {
            tracing::trace!(element = id, "KPI field not in template, skipped");
        }
    }

    let bars = [
        (ids::ON_TIME_BAR, format_percent(snapshot.on_time)),
        (ids::AVG_SPEED_BAR, speed_bar_width(snapshot.avg_speed)),
        (ids::EFFICIENCY_BAR, format_percent(snapshot.efficiency)),
    ];
    for (id, width) in bars {
        surface.set_width(id, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            active_trains: 7,
            efficiency: 82.0,
            avg_delay: 3.0,
            on_time: 95.0,
            avg_speed: 80.0,
            alerts: vec![],
        }
    }

    #[test]
    fn test_format_number_trims() {
        assert_eq!(format_number(82.0), "82");
        assert_eq!(format_number(8.94), "8.94");
        assert_eq!(format_number(66.666_666), "66.67");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn test_speed_bar_width() {
        assert_eq!(speed_bar_width(80.0), "66.67%");
        assert_eq!(speed_bar_width(120.0), "100%");
        assert_eq!(speed_bar_width(60.0), "50%");
    }

    #[test]
    fn test_write_snapshot_overwrites_every_field() {
        let mut surface = Surface::control_center();
        write_snapshot(&mut surface, &snapshot());

        assert_eq!(surface.text(ids::ACTIVE_TRAINS), Some("7"));
        assert_eq!(surface.text(ids::NETWORK_EFFICIENCY), Some("82%"));
        assert_eq!(surface.text(ids::AVG_DELAY), Some("3 min"));
        assert_eq!(surface.text(ids::ON_TIME_METRIC), Some("95%"));
        assert_eq!(surface.width(ids::ON_TIME_BAR), Some("95%"));
        assert_eq!(surface.text(ids::AVG_SPEED_METRIC), Some("80 km/h"));
        assert_eq!(surface.width(ids::AVG_SPEED_BAR), Some("66.67%"));
        assert_eq!(surface.text(ids::EFFICIENCY_METRIC), Some("82%"));
        assert_eq!(surface.width(ids::EFFICIENCY_BAR), Some("82%"));
    }

    #[test]
    fn test_write_snapshot_skips_missing_fields() {
        let mut surface = Surface::control_center();
        surface.remove_field(ids::AVG_DELAY);

        write_snapshot(&mut surface, &snapshot());
        assert!(surface.text(ids::AVG_DELAY).is_none());
        assert_eq!(surface.text(ids::ACTIVE_TRAINS), Some("7"));
    }
}

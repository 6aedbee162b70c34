//! The element template the dashboard writes into.
//!
//! Mirrors a fixed page layout: KPI text fields, progress bars, content
//! panels, navigation items, the insights panel and the sidebar. Writes to
//! identifiers that are not part of the template are skipped.

use std::collections::BTreeMap;
use std::time::Instant;

/// Element identifiers of the control-center template
pub mod ids {
    pub const ACTIVE_TRAINS: &str = "active-trains";
    pub const NETWORK_EFFICIENCY: &str = "network-efficiency";
    pub const AVG_DELAY: &str = "avg-delay";
    pub const ON_TIME_METRIC: &str = "on-time-metric";
    pub const ON_TIME_BAR: &str = "on-time-bar";
    pub const AVG_SPEED_METRIC: &str = "avg-speed-metric";
    pub const AVG_SPEED_BAR: &str = "avg-speed-bar";
    pub const EFFICIENCY_METRIC: &str = "efficiency-metric";
    pub const EFFICIENCY_BAR: &str = "efficiency-bar";
    pub const ACTIVE_ALERTS_COUNT: &str = "active-alerts-count";
    pub const ALERTS_TITLE: &str = "alerts-title";

    pub const CONTROL_CENTER: &str = "control-center";
    pub const TIMELINE: &str = "timeline";
    pub const ANALYTICS: &str = "analytics";
    pub const SETTINGS: &str = "settings";
}

/// Placeholder for KPI fields that have not been written yet
pub const EMPTY_FIELD: &str = "--";

/// One mutually exclusive content view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub id: String,
    pub title: String,
    pub hidden: bool,
}

/// Sidebar navigation entry pointing at a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub target: String,
    pub active: bool,
}

/// In-memory page state
#[derive(Debug, Clone)]
pub struct Surface {
    panels: Vec<Panel>,
    nav: Vec<NavItem>,
    text: BTreeMap<&'static str, String>,
    bars: BTreeMap<&'static str, String>,
    sidebar_hidden: bool,
    has_insights: bool,
    has_sidebar_toggle: bool,
    highlight_until: Option<Instant>,
}

impl Surface {
    /// The standard Traffic Control Center layout.
    pub fn control_center() -> Self {
        let panels = [
            (ids::CONTROL_CENTER, "Control Center"),
            (ids::TIMELINE, "Timeline"),
            (ids::ANALYTICS, "Analytics"),
            (ids::SETTINGS, "Settings"),
        ];

        let text_fields = [
            ids::ACTIVE_TRAINS,
            ids::NETWORK_EFFICIENCY,
            ids::AVG_DELAY,
            ids::ON_TIME_METRIC,
            ids::AVG_SPEED_METRIC,
            ids::EFFICIENCY_METRIC,
            ids::ACTIVE_ALERTS_COUNT,
            ids::ALERTS_TITLE,
        ];
        let bars = [ids::ON_TIME_BAR, ids::AVG_SPEED_BAR, ids::EFFICIENCY_BAR];

        Self {
            panels: panels
                .iter()
                .map(|(id, title)| Panel {
                    id: id.to_string(),
                    title: title.to_string(),
                    hidden: true,
                })
                .collect(),
            nav: panels
                .iter()
                .map(|(id, title)| NavItem {
                    label: title.to_string(),
                    target: id.to_string(),
                    active: false,
                })
                .collect(),
            text: text_fields
                .into_iter()
                .map(|id| (id, EMPTY_FIELD.to_string()))
                .collect(),
            bars: bars.into_iter().map(|id| (id, "0%".to_string())).collect(),
            sidebar_hidden: false,
            has_insights: true,
            has_sidebar_toggle: true,
            highlight_until: None,
        }
    }

    /// Build a custom template. Navigation mirrors the panel list.
    pub fn with_panels(panels: &[(&str, &str)]) -> Self {
        let mut surface = Self::control_center();
        surface.panels = panels
            .iter()
            .map(|(id, title)| Panel {
                id: id.to_string(),
                title: title.to_string(),
                hidden: true,
            })
            .collect();
        surface.nav = panels
            .iter()
            .map(|(id, title)| NavItem {
                label: title.to_string(),
                target: id.to_string(),
                active: false,
            })
            .collect();
        surface
    }

    /// Drop the insights button and panel from the template.
    pub fn without_insights(mut self) -> Self {
        self.has_insights = false;
        self.highlight_until = None;
        self
    }

    /// Drop the sidebar toggle from the template.
    pub fn without_sidebar_toggle(mut self) -> Self {
        self.has_sidebar_toggle = false;
        self
    }

    // -- text and bars ------------------------------------------------------

    /// Write a text field. Returns false when the id is not in the template.
    pub fn set_text(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.text.get_mut(id) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.text.get(id).map(String::as_str)
    }

    /// Write a bar width (a percentage string). Returns false when absent.
    pub fn set_width(&mut self, id: &str, width: impl Into<String>) -> bool {
        match self.bars.get_mut(id) {
            Some(slot) => {
                *slot = width.into();
                true
            }
            None => false,
        }
    }

    pub fn width(&self, id: &str) -> Option<&str> {
        self.bars.get(id).map(String::as_str)
    }

    /// Remove a field from the template.
    pub fn remove_field(&mut self, id: &str) {
        self.text.remove(id);
        self.bars.remove(id);
    }

    // -- panels and navigation ---------------------------------------------

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub(crate) fn panels_mut(&mut self) -> &mut [Panel] {
        &mut self.panels
    }

    pub fn nav_items(&self) -> &[NavItem] {
        &self.nav
    }

    pub(crate) fn nav_items_mut(&mut self) -> &mut [NavItem] {
        &mut self.nav
    }

    /// Panels currently shown
    pub fn visible_panels(&self) -> Vec<&Panel> {
        self.panels.iter().filter(|p| !p.hidden).collect()
    }

    /// The single visible panel, if exactly one is visible.
    pub fn visible_panel(&self) -> Option<&Panel> {
        let visible = self.visible_panels();
        if visible.len() == 1 {
            Some(visible[0])
        } else {
            None
        }
    }

    pub fn active_nav(&self) -> Option<&NavItem> {
        self.nav.iter().find(|n| n.active)
    }

    // -- sidebar and insights -----------------------------------------------

    pub fn has_sidebar_toggle(&self) -> bool {
        self.has_sidebar_toggle
    }

    pub fn sidebar_hidden(&self) -> bool {
        self.sidebar_hidden
    }

    pub(crate) fn toggle_sidebar(&mut self) {
        self.sidebar_hidden = !self.sidebar_hidden;
    }

    pub fn has_insights(&self) -> bool {
        self.has_insights
    }

    pub(crate) fn set_highlight_until(&mut self, deadline: Instant) {
        if self.has_insights {
            self.highlight_until = Some(deadline);
        }
    }

    /// Whether the insights panel glows at `now`.
    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }

    /// Clear an elapsed highlight. Returns true if one was cleared.
    pub fn expire_highlight(&mut self, now: Instant) -> bool {
        match self.highlight_until {
            Some(until) if now >= until => {
                self.highlight_until = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::control_center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_control_center_starts_hidden_and_blank() {
        let surface = Surface::control_center();
        assert_eq!(surface.panels().len(), 4);
        assert!(surface.visible_panels().is_empty());
        assert!(surface.active_nav().is_none());
        assert_eq!(surface.text(ids::ACTIVE_TRAINS), Some(EMPTY_FIELD));
        assert_eq!(surface.width(ids::AVG_SPEED_BAR), Some("0%"));
    }

    #[test]
    fn test_set_text_on_unknown_id_is_skipped() {
        let mut surface = Surface::control_center();
        assert!(!surface.set_text("no-such-field", "1"));
        assert!(surface.text("no-such-field").is_none());
        assert!(surface.set_text(ids::AVG_DELAY, "3 min"));
        assert_eq!(surface.text(ids::AVG_DELAY), Some("3 min"));
    }

    #[test]
    fn test_removed_field_no_longer_accepts_writes() {
        let mut surface = Surface::control_center();
        surface.remove_field(ids::EFFICIENCY_BAR);
        assert!(!surface.set_width(ids::EFFICIENCY_BAR, "50%"));
    }

    #[test]
    fn test_highlight_expires() {
        let mut surface = Surface::control_center();
        let now = Instant::now();
        surface.set_highlight_until(now + Duration::from_millis(1500));

        assert!(surface.is_highlighted(now));
        assert!(!surface.expire_highlight(now + Duration::from_millis(1499)));
        assert!(surface.expire_highlight(now + Duration::from_millis(1500)));
        assert!(!surface.is_highlighted(now));
    }

    #[test]
    fn test_highlight_ignored_without_insights() {
        let mut surface = Surface::control_center().without_insights();
        let now = Instant::now();
        surface.set_highlight_until(now + Duration::from_secs(1));
        assert!(!surface.is_highlighted(now));
    }
}

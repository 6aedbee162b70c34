//! Panel visibility and input bindings.
//!
//! The [`ViewController`] owns the (trigger, effect) bindings installed at
//! start-up and applies them to a [`Surface`]. Exactly one panel is visible
//! after initialization and after every successful navigation.

pub mod surface;

pub use surface::{ids, NavItem, Panel, Surface, EMPTY_FIELD};

use std::time::{Duration, Instant};
use thiserror::Error;

/// How long the insights panel glows after the button is pressed
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1500);

/// Errors raised by view operations. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("panel '{0}' not found")]
    NotFound(String),
}

/// Input that can fire a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(char),
}

/// What a binding does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Activate a navigation item and show its target panel
    Navigate(String),
    /// Make the insights panel glow for [`HIGHLIGHT_DURATION`]
    HighlightInsights,
    /// Show or hide the sidebar
    ToggleSidebar,
}

/// One declarative (trigger, effect) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub trigger: Trigger,
    pub effect: Effect,
    pub description: String,
}

/// Result of dispatching a trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing is bound to the trigger
    Unbound,
    /// Bound, but the effect changed nothing (e.g. clicking the active item)
    Unchanged,
    /// The surface changed
    Applied,
}

/// Owns the binding table and mutates the surface on input.
#[derive(Debug, Clone)]
pub struct ViewController {
    bindings: Vec<Binding>,
    default_panel: String,
}

impl ViewController {
    /// Build bindings for the given template.
    pub fn new(surface: &Surface) -> Self {
        let default_panel = surface
            .nav_items()
            .first()
            .map(|n| n.target.clone())
            .unwrap_or_else(|| ids::CONTROL_CENTER.to_string());

        Self {
            bindings: setup_bindings(surface),
            default_panel,
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Show the default panel and mark its navigation item active.
    pub fn init(&self, surface: &mut Surface) -> Result<(), ViewError> {
        let target = self.default_panel.clone();
        navigate(surface, &target).map(|_| ())
    }

    /// Find the binding for `trigger` and apply it.
    pub fn dispatch(
        &self,
        surface: &mut Surface,
        trigger: Trigger,
        now: Instant,
    ) -> Result<Dispatch, ViewError> {
        let Some(binding) = self.bindings.iter().find(|b| b.trigger == trigger) else {
            return Ok(Dispatch::Unbound);
        };

        match &binding.effect {
            Effect::Navigate(target) => {
                if navigate(surface, target)? {
                    Ok(Dispatch::Applied)
                } else {
                    Ok(Dispatch::Unchanged)
                }
            }
            Effect::HighlightInsights => {
                tracing::debug!("Insights button pressed");
                surface.set_highlight_until(now + HIGHLIGHT_DURATION);
                Ok(Dispatch::Applied)
            }
            Effect::ToggleSidebar => {
                surface.toggle_sidebar();
                Ok(Dispatch::Applied)
            }
        }
    }

    /// Map a typed command to a trigger.
    ///
    /// Accepts a bound key (`1`, `i`, `s`, ...), a panel id, or a panel label
    /// (case-insensitive).
    pub fn resolve_input(&self, surface: &Surface, input: &str) -> Option<Trigger> {
        let input = input.trim();
        let mut chars = input.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let trigger = Trigger::Key(c.to_ascii_lowercase());
            if self.bindings.iter().any(|b| b.trigger == trigger) {
                return Some(trigger);
            }
        }

        let target = surface
            .nav_items()
            .iter()
            .find(|n| n.target.eq_ignore_ascii_case(input) || n.label.eq_ignore_ascii_case(input))?
            .target
            .clone();

        self.bindings
            .iter()
            .find(|b| b.effect == Effect::Navigate(target.clone()))
            .map(|b| b.trigger)
    }
}

/// Declare the bindings for a template.
///
/// Navigation items get the digit keys `1`..`9` in order; the insights
/// button is `i` and the sidebar toggle is `s`, each only when present.
pub fn setup_bindings(surface: &Surface) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = surface
        .nav_items()
        .iter()
        .zip('1'..='9')
        .map(|(item, key)| Binding {
            trigger: Trigger::Key(key),
            effect: Effect::Navigate(item.target.clone()),
            description: item.label.clone(),
        })
        .collect();

    if surface.has_insights() {
        bindings.push(Binding {
            trigger: Trigger::Key('i'),
            effect: Effect::HighlightInsights,
            description: "AI Insights".to_string(),
        });
    }
    if surface.has_sidebar_toggle() {
        bindings.push(Binding {
            trigger: Trigger::Key('s'),
            effect: Effect::ToggleSidebar,
            description: "Toggle sidebar".to_string(),
        });
    }

    bindings
}

/// Hide every panel, then reveal `id`.
///
/// An unknown id is logged and leaves all panels hidden.
pub fn show_page(surface: &mut Surface, id: &str) -> Result<(), ViewError> {
    for panel in surface.panels_mut().iter_mut() {
        panel.hidden = true;
    }

    match surface.panels_mut().iter_mut().find(|p| p.id == id) {
        Some(panel) => {
            panel.hidden = false;
            Ok(())
        }
        None => {
            tracing::error!(panel = id, "Page not found");
            Err(ViewError::NotFound(id.to_string()))
        }
    }
}

/// Activate the nav item targeting `target` and show its panel.
///
/// Returns `Ok(false)` when the item was already active.
fn navigate(surface: &mut Surface, target: &str) -> Result<bool, ViewError> {
    if surface
        .active_nav()
        .is_some_and(|item| item.target == target)
    {
        return Ok(false);
    }

    for item in surface.nav_items_mut().iter_mut() {
        item.active = item.target == target;
    }
    show_page(surface, target)?;

    if let Some(item) = surface.active_nav() {
        tracing::info!(panel = %item.label, "Switched panel");
    }
    Ok(true)
}

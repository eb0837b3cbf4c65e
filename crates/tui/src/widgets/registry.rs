//! Widget kind to region strategy table.
//!
//! The screen renderer never matches on widget kinds itself. It asks the
//! [`Registry`] how tall a widget wants to be and to build the region that
//! will fit it. The registry is built once, handed to the app, and can be
//! extended or overridden per sign.

use std::collections::HashMap;

use headway_config::CarouselConfig;
use headway_protocol::{WidgetData, WidgetKind};
use ratatui::layout::Constraint;
use tracing::debug;

use super::{AlertRegion, DeparturesRegion, PlaceholderRegion, Region, SubwayStatusRegion};

/// Height given to placeholders and to widgets without a strategy.
const PLACEHOLDER_HEIGHT: u16 = 3;

/// How to lay out and fit one widget kind.
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    /// The vertical space the widget asks for.
    pub constraint: fn(&WidgetData) -> Constraint,
    /// Creates the region that fits the widget.
    pub build: fn(&CarouselConfig) -> Box<dyn Region>,
}

/// Maps widget kinds to strategies.
///
/// # Examples
///
/// ```
/// use headway_config::CarouselConfig;
/// use headway_protocol::WidgetData;
/// use headway_tui::widgets::Registry;
///
/// let registry = Registry::standard();
/// let widget = WidgetData::Placeholder { text: None };
/// let region = registry.build(&widget, &CarouselConfig::default());
/// assert_eq!(region.label(), "placeholder");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    strategies: HashMap<WidgetKind, Strategy>,
}

impl Registry {
    /// Creates a registry with no strategies; every widget renders as a
    /// placeholder.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the registry for the built-in widgets.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(
            WidgetKind::Departures,
            Strategy {
                constraint: |_| Constraint::Fill(3),
                build: |cadence| Box::new(DeparturesRegion::new(cadence.clone())),
            },
        );
        registry.register(
            WidgetKind::Alert,
            Strategy {
                constraint: |_| Constraint::Fill(1),
                build: |cadence| Box::new(AlertRegion::new(cadence)),
            },
        );
        registry.register(
            WidgetKind::SubwayStatus,
            Strategy {
                constraint: |_| Constraint::Fill(1),
                build: |_| Box::new(SubwayStatusRegion::new()),
            },
        );
        registry.register(
            WidgetKind::Placeholder,
            Strategy {
                constraint: |_| Constraint::Length(PLACEHOLDER_HEIGHT),
                build: |_| Box::new(PlaceholderRegion),
            },
        );
        registry
    }

    /// Sets the strategy for `kind`, returning the one it replaces.
    pub fn register(&mut self, kind: WidgetKind, strategy: Strategy) -> Option<Strategy> {
        self.strategies.insert(kind, strategy)
    }

    /// Returns the strategy for `kind`.
    #[must_use]
    pub fn get(&self, kind: WidgetKind) -> Option<&Strategy> {
        self.strategies.get(&kind)
    }

    /// Returns the vertical constraint for `widget`.
    #[must_use]
    pub fn constraint(&self, widget: &WidgetData) -> Constraint {
        self.get(widget.kind())
            .map_or(Constraint::Length(PLACEHOLDER_HEIGHT), |strategy| {
                (strategy.constraint)(widget)
            })
    }

    /// Builds the region for `widget`, falling back to a placeholder.
    #[must_use]
    pub fn build(&self, widget: &WidgetData, cadence: &CarouselConfig) -> Box<dyn Region> {
        match self.get(widget.kind()) {
            Some(strategy) => (strategy.build)(cadence),
            None => {
                debug!(kind = ?widget.kind(), "no strategy for widget, using placeholder");
                Box::new(PlaceholderRegion)
            }
        }
    }
}

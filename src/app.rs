//! Application state and logic.

use std::time::Instant;

use ratatui::layout::{Position, Rect};

use crate::coordinator::Coordinator;
use crate::registry::ComponentKind;
use crate::renderer::SharedScene;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Components and refresh cycle.
    pub coordinator: Coordinator,
    /// Scene the accelerated chart backend presents into.
    pub scene: SharedScene,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Set when the user asked to quit.
    pub should_quit: bool,
    /// Screen area of the table body from the last draw, for mouse hits.
    pub table_body: Rect,
}

impl App {
    /// Create the application and define its components.
    pub fn new(mut coordinator: Coordinator, scene: SharedScene) -> Self {
        let registry = coordinator.registry_mut();
        registry.define(ComponentKind::StockTable);
        registry.define(ComponentKind::StockGraph);

        Self {
            coordinator,
            scene,
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
            should_quit: false,
            table_body: Rect::default(),
        }
    }

    /// Advance the coordinator before drawing.
    pub fn tick(&mut self, now: Instant) {
        let fetches = self.coordinator.fetch_count();
        self.coordinator.tick(now);

        if let Some(err) = self.coordinator.last_error() {
            self.status = format!("Fetch failed: {}", err);
        } else if self.coordinator.fetch_count() != fetches {
            self.status = format!(
                "Updated {} quotes",
                self.coordinator.snapshot().len()
            );
        }
    }

    /// Frame boundary after drawing.
    pub fn frame(&mut self) {
        self.coordinator.frame();
    }

    /// Select the next row.
    pub fn select_next(&mut self) {
        self.coordinator.table_mut().select_next();
    }

    /// Select the previous row.
    pub fn select_previous(&mut self) {
        self.coordinator.table_mut().select_previous();
    }

    /// Select the first row.
    pub fn select_first(&mut self) {
        self.coordinator.table_mut().select_first();
    }

    /// Select the last row.
    pub fn select_last(&mut self) {
        self.coordinator.table_mut().select_last();
    }

    /// Handle a mouse click at a screen position.
    pub fn click(&mut self, column: u16, row: u16) {
        if !self.table_body.contains(Position::new(column, row)) {
            return;
        }
        let table = self.coordinator.table_mut();
        let index = table.scroll() + usize::from(row - self.table_body.y);
        table.select_row(index);
    }

    /// Fetch immediately.
    pub fn refresh(&mut self, now: Instant) {
        self.coordinator.force_refresh(now);
        self.status = match self.coordinator.last_error() {
            Some(err) => format!("Fetch failed: {}", err),
            None => format!("Updated {} quotes", self.coordinator.snapshot().len()),
        };
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Quit, tearing the graph down first.
    pub fn quit(&mut self) {
        self.coordinator.shutdown();
        self.should_quit = true;
    }
}

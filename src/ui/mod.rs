//! User interface rendering.

pub mod formatters;
mod graph_view;
mod keymap_bar;
mod status_bar;
mod table_view;
mod theme;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Graph over table, then status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    graph_view::draw_graph(f, app, chunks[0], &colors);
    table_view::draw_table(f, app, chunks[1], &colors);
    status_bar::draw_status(f, chunks[2], app, &colors);
    keymap_bar::draw_keymap(f, chunks[3], &colors);
}

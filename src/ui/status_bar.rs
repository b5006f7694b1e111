//! Status bar UI component.

use crate::app::App;
use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the status bar.
pub(super) fn draw_status(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let graph = app.coordinator.graph();
    let renderer = match graph.context_version() {
        Some(version) => format!("{} ({})", graph.mode().name(), version.name()),
        None => graph.mode().name().to_string(),
    };
    let text = format!(" {} | renderer: {} ", app.status, renderer);

    let paragraph =
        Paragraph::new(text).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    f.render_widget(paragraph, area);
}

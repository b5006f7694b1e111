//! Quote table view.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::formatters::{format_change, format_price};
use crate::ui::ThemeColors;

pub(super) fn draw_table(f: &mut Frame<'_>, app: &mut App, area: Rect, colors: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title(" Quotes ")
        .title_style(Style::default().fg(colors.heading));
    let inner = block.inner(area);

    // One line goes to the header
    let visible_rows = usize::from(inner.height.saturating_sub(1));
    app.table_body = Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    };

    let table_state = app.coordinator.table_mut();
    table_state.adjust_scroll(visible_rows);
    let selected = table_state.selected_index();
    let scroll = table_state.scroll();

    let rows: Vec<Row<'_>> = table_state
        .rows()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_rows)
        .map(|(i, record)| {
            let change_color = if record.change < 0.0 {
                colors.loss
            } else {
                colors.gain
            };
            let row = Row::new(vec![
                Cell::from(record.symbol.clone()).style(Style::default().fg(colors.heading)),
                Cell::from(record.name.clone()),
                Cell::from(format!("{:>12}", format_price(record.price))),
                Cell::from(format!("{:>8}", format_change(record.change)))
                    .style(Style::default().fg(change_color)),
            ]);
            if Some(i) == selected {
                row.style(
                    Style::default()
                        .fg(colors.cursor_fg)
                        .bg(colors.cursor_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("Symbol"),
        Cell::from("Company"),
        Cell::from(format!("{:>12}", "Price")),
        Cell::from(format!("{:>8}", "Change")),
    ])
    .style(Style::default().fg(colors.heading).add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(8),
        Constraint::Min(12),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(table, area);
}

//! Price graph view.
//!
//! The graph component owns a pixel surface sized from this view's area.
//! Depending on the renderer mode the view shows the accelerated chart
//! scene, rasterizes the software surface into braille cells, or shows
//! the surface placeholder.

use std::sync::PoisonError;

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::renderer::{ChartScene, ContextVersion};
use crate::surface::{Surface, SurfaceContent, TextAlign};
use crate::ui::ThemeColors;

const BRAILLE_BASE: u32 = 0x2800;

// Dot bit for (column, row) inside one braille cell.
const BRAILLE_DOTS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

pub(super) fn draw_graph(f: &mut Frame<'_>, app: &mut App, area: Rect, colors: &ThemeColors) {
    let title = match app.coordinator.table().selected() {
        Some(symbol) => format!(" {} · {} ", symbol, app.coordinator.graph().mode().name()),
        None => format!(" Graph · {} ", app.coordinator.graph().mode().name()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title(title)
        .title_style(Style::default().fg(colors.heading))
        .style(Style::default().bg(colors.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    app.coordinator.layout_graph(inner.width, inner.height);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(surface) = app.coordinator.graph().surface() else {
        draw_message(f, inner, "Waiting for components", colors);
        return;
    };

    match surface.content() {
        SurfaceContent::Placeholder(message) => draw_message(f, inner, message, colors),
        SurfaceContent::Blank => draw_message(f, inner, "No data", colors),
        SurfaceContent::Drawing => draw_surface(f, inner, surface, colors),
        SurfaceContent::External => {
            let scene = app.scene.lock().unwrap_or_else(PoisonError::into_inner).clone();
            draw_scene(f, inner, &scene, colors);
        }
    }
}

fn draw_message(f: &mut Frame<'_>, area: Rect, message: &str, colors: &ThemeColors) {
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    let para = Paragraph::new(message.to_string())
        .style(Style::default().fg(colors.muted))
        .alignment(Alignment::Center);
    f.render_widget(para, middle);
}

/// Rasterize the software surface, 2x4 dots per cell.
fn draw_surface(f: &mut Frame<'_>, area: Rect, surface: &Surface, colors: &ThemeColors) {
    let cols = u32::from(area.width);
    let rows = u32::from(area.height);
    let mut cells = vec![0u8; (cols * rows) as usize];

    for (px, py) in surface.lit_pixels() {
        let dx = (px * cols * 2 / surface.width()).min(cols * 2 - 1);
        let dy = (py * rows * 4 / surface.height()).min(rows * 4 - 1);
        let cell = &mut cells[((dy / 4) * cols + dx / 2) as usize];
        *cell |= BRAILLE_DOTS[(dx % 2) as usize][(dy % 4) as usize];
    }

    let buf = f.buffer_mut();
    for (i, &dots) in cells.iter().enumerate() {
        if dots == 0 {
            continue;
        }
        let x = area.x + (i as u32 % cols) as u16;
        let y = area.y + (i as u32 / cols) as u16;
        let ch = char::from_u32(BRAILLE_BASE + u32::from(dots)).unwrap_or('•');
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_char(ch).set_fg(colors.line);
        }
    }

    for label in surface.labels() {
        let col = (label.x.max(0.0) as u32 * cols / surface.width()).min(cols - 1);
        // anchor sits on the text baseline, a few pixels below the tick
        let row = (label.y.max(0.0) as u32 * rows / surface.height()).min(rows - 1);
        let len = label.text.chars().count() as u32;
        let start = match label.align {
            TextAlign::Left => col,
            TextAlign::Right => col.saturating_sub(len),
        };
        buf.set_string(
            area.x + start as u16,
            area.y + row as u16,
            &label.text,
            Style::default().fg(colors.muted),
        );
    }
}

/// Present the accelerated chart scene through ratatui's chart widget.
fn draw_scene(f: &mut Frame<'_>, area: Rect, scene: &ChartScene, colors: &ThemeColors) {
    if scene.samples.is_empty() {
        draw_message(f, area, "No data", colors);
        return;
    }

    let data: Vec<(f64, f64)> = scene
        .samples
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let (mut y_min, mut y_max) = scene
        .samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if y_max - y_min < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let x_max = (data.len().max(2) - 1) as f64;

    let marker = match scene.version {
        Some(ContextVersion::V1) => Marker::Block,
        _ => Marker::Braille,
    };
    let datasets = vec![Dataset::default()
        .marker(marker)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colors.line))
        .data(&data)];

    let y_labels = vec![
        format!("{:.2}", y_min),
        format!("{:.2}", (y_min + y_max) / 2.0),
        format!("{:.2}", y_max),
    ];
    let chart = Chart::new(datasets)
        .style(Style::default().bg(colors.bg))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(colors.axis))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(colors.axis))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

//! Runtime configuration.

use std::time::Duration;

use crate::graph::RendererPreference;

/// Default refresh period.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

/// Default number of prices kept per symbol.
pub const DEFAULT_HISTORY: usize = 120;

/// Device pixels covered by one terminal cell when the terminal does not
/// report its pixel size.
pub const DEFAULT_CELL_PIXELS: (u16, u16) = (8, 16);

/// Viewer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Time between fetches.
    pub refresh_interval: Duration,
    /// Prices kept per symbol.
    pub history_capacity: usize,
    /// Graph renderer preference.
    pub renderer: RendererPreference,
    /// Pixel size of one terminal cell (width, height).
    pub cell_pixels: (u16, u16),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH,
            history_capacity: DEFAULT_HISTORY,
            renderer: RendererPreference::Auto,
            cell_pixels: DEFAULT_CELL_PIXELS,
        }
    }
}

impl Config {
    /// Pixel size of a layout box `cols` x `rows` cells wide.
    pub fn layout_pixels(&self, cols: u16, rows: u16) -> (u32, u32) {
        (
            u32::from(cols) * u32::from(self.cell_pixels.0.max(1)),
            u32::from(rows) * u32::from(self.cell_pixels.1.max(1)),
        )
    }

    /// Derive the cell pixel size from a terminal's reported window size,
    /// keeping the default when it reports zeros.
    pub fn with_window_pixels(mut self, cols: u16, rows: u16, width: u16, height: u16) -> Self {
        if cols > 0 && rows > 0 && width > 0 && height > 0 {
            self.cell_pixels = ((width / cols).max(1), (height / rows).max(1));
        }
        self
    }
}

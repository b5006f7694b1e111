//! Data-to-pixel transform for the software graph path.
//!
//! Maps a sample series and a pixel rectangle to drawable geometry: the
//! two axis lines, five price ticks and the polyline. Pixel y grows
//! downward, so larger values map to smaller y.

/// Padding reserved on every side of the surface for axis rendering.
pub const PADDING: f64 = 40.0;

/// Number of tick labels along the value axis.
pub const TICK_COUNT: usize = 5;

/// A point in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// A value-axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Value the tick stands for.
    pub value: f64,
    /// Vertical pixel position.
    pub y: f64,
    /// Rendered label.
    pub label: String,
}

/// A straight axis segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    /// Start point.
    pub from: PlotPoint,
    /// End point.
    pub to: PlotPoint,
}

/// Everything the fallback renderer draws for one update.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGeometry {
    /// Vertical value axis along the left padding edge.
    pub y_axis: AxisLine,
    /// Horizontal axis along the bottom padding edge.
    pub x_axis: AxisLine,
    /// Ticks from `min` (bottom) to `max` (top).
    pub ticks: Vec<AxisTick>,
    /// Polyline points; empty for fewer than two samples.
    pub points: Vec<PlotPoint>,
}

/// Compute plot geometry for `samples` on a `width` x `height` surface.
pub fn plot_geometry(samples: &[f64], width: f64, height: f64) -> PlotGeometry {
    let plot_width = (width - 2.0 * PADDING).max(0.0);
    let plot_height = (height - 2.0 * PADDING).max(0.0);
    let bottom = PADDING + plot_height;

    let (min, max) = value_bounds(samples);
    let range = max - min;

    let ticks = (0..TICK_COUNT)
        .map(|i| {
            let t = i as f64 / (TICK_COUNT - 1) as f64;
            let value = min + range * t;
            AxisTick {
                value,
                y: PADDING + (1.0 - t) * plot_height,
                label: format!("{:.2}", value),
            }
        })
        .collect();

    let points = if samples.len() < 2 {
        Vec::new()
    } else {
        let last = (samples.len() - 1) as f64;
        samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = PADDING + (i as f64 / last) * plot_width;
                let y = if range == 0.0 {
                    PADDING + plot_height / 2.0
                } else {
                    PADDING + (1.0 - (v - min) / range) * plot_height
                };
                PlotPoint { x, y }
            })
            .collect()
    };

    PlotGeometry {
        y_axis: AxisLine {
            from: PlotPoint { x: PADDING, y: PADDING },
            to: PlotPoint { x: PADDING, y: bottom },
        },
        x_axis: AxisLine {
            from: PlotPoint { x: PADDING, y: bottom },
            to: PlotPoint {
                x: PADDING + plot_width,
                y: bottom,
            },
        },
        ticks,
        points,
    }
}

fn value_bounds(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

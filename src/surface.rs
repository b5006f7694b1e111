//! Drawing surfaces owned by the graph component.
//!
//! A [`Surface`] is a monochrome pixel buffer plus text labels, driven by
//! a small immediate-mode API. The terminal view rasterizes it to braille
//! cells; nothing else reads the pixels.

use std::fmt;

/// Minimum surface edge, in device pixels.
pub const MIN_SURFACE_EDGE: u32 = 100;

/// Identity of a mounted surface; unique per mount.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal anchoring of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Label starts at the anchor.
    Left,
    /// Label ends at the anchor.
    Right,
}

/// A text label placed in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLabel {
    /// Label text.
    pub text: String,
    /// Anchor x.
    pub x: f64,
    /// Anchor y (label baseline row).
    pub y: f64,
    /// Anchoring.
    pub align: TextAlign,
}

/// What the surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceContent {
    /// Nothing drawn yet.
    Blank,
    /// A neutral placeholder message.
    Placeholder(String),
    /// Pixels and labels from the immediate-mode API.
    Drawing,
    /// The accelerated backend presents on its own.
    External,
}

/// Pixel buffer plus labels.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    width: u32,
    height: u32,
    pixels: Vec<bool>,
    labels: Vec<SurfaceLabel>,
    content: SurfaceContent,
}

impl Surface {
    /// Allocate a surface; each edge is clamped to [`MIN_SURFACE_EDGE`].
    pub fn new(id: SurfaceId, width: u32, height: u32) -> Self {
        let (width, height) = clamp_size(width, height);
        Self {
            id,
            width,
            height,
            pixels: vec![false; (width * height) as usize],
            labels: Vec::new(),
            content: SurfaceContent::Blank,
        }
    }

    /// Surface identity.
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current content kind.
    pub fn content(&self) -> &SurfaceContent {
        &self.content
    }

    /// Text labels drawn since the last clear.
    pub fn labels(&self) -> &[SurfaceLabel] {
        &self.labels
    }

    /// Reallocate to a new size, dropping the current drawing.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_size(width, height);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![false; (width * height) as usize];
        self.labels.clear();
        if self.content == SurfaceContent::Drawing {
            self.content = SurfaceContent::Blank;
        }
    }

    /// Clear pixels and labels.
    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
        self.labels.clear();
        self.content = SurfaceContent::Blank;
    }

    /// Replace the drawing with a placeholder message.
    pub fn show_placeholder(&mut self, message: impl Into<String>) {
        self.clear();
        self.content = SurfaceContent::Placeholder(message.into());
    }

    /// Hand presentation over to an external renderer.
    pub fn mark_external(&mut self) {
        self.clear();
        self.content = SurfaceContent::External;
    }

    /// Whether the pixel at `(x, y)` is set.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(y * self.width + x) as usize]
    }

    /// Iterate over set pixels as `(x, y)`.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, &lit)| lit)
            .map(move |(i, _)| (i as u32 % width, i as u32 / width))
    }

    /// Stroke a one-pixel line.
    pub fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.content = SurfaceContent::Drawing;

        // Bresenham over rounded endpoints
        let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
        let (tx, ty) = (x1.round() as i64, y1.round() as i64);
        let dx = (tx - x).abs();
        let dy = -(ty - y).abs();
        let sx = if x < tx { 1 } else { -1 };
        let sy = if y < ty { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y);
            if x == tx && y == ty {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Stroke consecutive segments through `points`.
    pub fn stroke_polyline(&mut self, points: &[(f64, f64)]) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0].0, pair[0].1, pair[1].0, pair[1].1);
        }
    }

    /// Place a text label.
    pub fn fill_text(&mut self, text: impl Into<String>, x: f64, y: f64, align: TextAlign) {
        self.content = SurfaceContent::Drawing;
        self.labels.push(SurfaceLabel {
            text: text.into(),
            x,
            y,
            align,
        });
    }

    fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = true;
    }
}

fn clamp_size(width: u32, height: u32) -> (u32, u32) {
    (width.max(MIN_SURFACE_EDGE), height.max(MIN_SURFACE_EDGE))
}

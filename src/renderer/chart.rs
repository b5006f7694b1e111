//! Terminal chart backend.
//!
//! Presents submitted samples through ratatui's `Chart` widget. The probe
//! reads the terminal environment: a UTF-8 locale gives the braille
//! context (`V2`), any other non-dumb terminal gives the block context
//! (`V1`).

use std::sync::{Arc, Mutex, PoisonError};

use super::{ContextVersion, PendingInit, RendererCapability, RendererHandle};
use crate::surface::SurfaceId;

/// What the chart view should present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScene {
    /// Surface the scene is bound to, while a handle is live.
    pub surface: Option<SurfaceId>,
    /// Context the handle was built for.
    pub version: Option<ContextVersion>,
    /// Last submitted samples.
    pub samples: Vec<f64>,
    /// Pixel width of the last submission.
    pub width: u32,
    /// Pixel height of the last submission.
    pub height: u32,
    /// Number of submissions since binding.
    pub frames: u64,
}

/// Scene shared between the backend and the terminal view.
pub type SharedScene = Arc<Mutex<ChartScene>>;

/// Terminal facts the probe depends on.
#[derive(Debug, Clone, Default)]
pub struct TerminalEnv {
    /// Value of `TERM`.
    pub term: Option<String>,
    /// First of `LC_ALL`, `LC_CTYPE`, `LANG` that is set.
    pub locale: Option<String>,
}

impl TerminalEnv {
    /// Read the current process environment.
    pub fn from_env() -> Self {
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        Self {
            term: std::env::var("TERM").ok(),
            locale,
        }
    }

    fn is_usable(&self) -> bool {
        matches!(self.term.as_deref(), Some(term) if !term.is_empty() && term != "dumb")
    }

    fn is_utf8(&self) -> bool {
        self.locale.as_deref().is_some_and(|l| {
            let l = l.to_ascii_lowercase();
            l.contains("utf-8") || l.contains("utf8")
        })
    }
}

/// Capability that binds a [`ChartScene`] to one surface at a time.
#[derive(Debug)]
pub struct TerminalChartCapability {
    env: TerminalEnv,
    scene: SharedScene,
}

impl TerminalChartCapability {
    /// Create a capability over `env`, presenting into `scene`.
    pub fn new(env: TerminalEnv, scene: SharedScene) -> Self {
        Self { env, scene }
    }

    /// The scene handles write into.
    pub fn scene(&self) -> SharedScene {
        Arc::clone(&self.scene)
    }
}

impl RendererCapability for TerminalChartCapability {
    fn probe(&self, version: ContextVersion) -> bool {
        let supported = match version {
            ContextVersion::V2 => self.env.is_usable() && self.env.is_utf8(),
            ContextVersion::V1 => self.env.is_usable(),
        };
        tracing::debug!(version = version.name(), supported, term = ?self.env.term, "probed chart context");
        supported
    }

    fn initialize(&self, surface: &SurfaceId, version: ContextVersion) -> PendingInit {
        let (completer, pending) = PendingInit::channel(surface.clone());

        let mut scene = self.scene.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bound) = &scene.surface {
            let reason = format!("chart scene already bound to {}", bound);
            drop(scene);
            completer.fail(reason);
            return pending;
        }

        *scene = ChartScene {
            surface: Some(surface.clone()),
            version: Some(version),
            ..ChartScene::default()
        };
        drop(scene);

        tracing::info!(surface = %surface, version = version.name(), "chart renderer constructed");
        completer.succeed(Box::new(ChartHandle {
            scene: Arc::clone(&self.scene),
            surface: surface.clone(),
            released: false,
        }));
        pending
    }
}

/// Live binding between one surface and the shared scene.
#[derive(Debug)]
pub struct ChartHandle {
    scene: SharedScene,
    surface: SurfaceId,
    released: bool,
}

impl RendererHandle for ChartHandle {
    fn submit(&mut self, samples: &[f32], width: u32, height: u32) {
        if self.released {
            return;
        }
        let mut scene = self.scene.lock().unwrap_or_else(PoisonError::into_inner);
        scene.samples = samples.iter().map(|&v| f64::from(v)).collect();
        scene.width = width;
        scene.height = height;
        scene.frames += 1;
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut scene = self.scene.lock().unwrap_or_else(PoisonError::into_inner);
        if scene.surface.as_ref() == Some(&self.surface) {
            *scene = ChartScene::default();
        }
        tracing::debug!(surface = %self.surface, "chart renderer released");
    }
}

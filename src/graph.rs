//! Price graph component.
//!
//! Owns one drawing surface and decides, once per mount, how it renders:
//!
//! ```text
//! Uninitialized ──probe ok──▶ (pending) ──handle──▶ Accelerated
//!       │                         └──error──────▶ Fallback2D
//!       └──────probe fails──────────────────────▶ Unsupported
//! ```
//!
//! Transitions are one-way until the next mount. Updates arriving while
//! initialization is pending are dropped, never queued.

use std::rc::Rc;

use crate::plot::{plot_geometry, PADDING};
use crate::renderer::{ContextVersion, InitPoll, PendingInit, RendererCapability, RendererHandle};
use crate::surface::{Surface, SurfaceId, TextAlign};

/// Placeholder shown while the accelerated renderer is being built.
pub const LOADING_MESSAGE: &str = "Loading renderer…";

/// Placeholder shown when no accelerated context exists.
pub const UNSUPPORTED_MESSAGE: &str = "No accelerated renderer available";

/// How the graph currently renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererMode {
    /// Not mounted, or initialization still pending.
    #[default]
    Uninitialized,
    /// Samples go to the accelerated backend.
    Accelerated,
    /// Samples are drawn by the software rasterizer.
    Fallback2D,
    /// No accelerated context could be obtained.
    Unsupported,
}

impl RendererMode {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            RendererMode::Uninitialized => "Initializing",
            RendererMode::Accelerated => "Accelerated",
            RendererMode::Fallback2D => "Software",
            RendererMode::Unsupported => "Unsupported",
        }
    }
}

/// Which renderer paths the graph may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererPreference {
    /// Probe for an accelerated context, fall back on failure.
    #[default]
    Auto,
    /// Skip the probe and draw in software.
    Software,
}

/// What `update_data` did with a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No surface is mounted.
    NoSurface,
    /// Forwarded to the accelerated backend.
    Submitted,
    /// Drawn into the surface.
    Drawn,
    /// Not rendered in the current mode.
    Dropped,
}

/// The graph component state machine.
#[derive(Debug)]
pub struct GraphComponent {
    capability: Rc<dyn RendererCapability>,
    preference: RendererPreference,
    mode: RendererMode,
    surface: Option<Surface>,
    handle: Option<Box<dyn RendererHandle>>,
    pending: Option<PendingInit>,
    context: Option<ContextVersion>,
}

impl GraphComponent {
    /// Create an unmounted graph.
    pub fn new(capability: Rc<dyn RendererCapability>, preference: RendererPreference) -> Self {
        Self {
            capability,
            preference,
            mode: RendererMode::Uninitialized,
            surface: None,
            handle: None,
            pending: None,
            context: None,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> RendererMode {
        self.mode
    }

    /// Mounted surface, if any.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Whether a surface exists and calls are accepted.
    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether accelerated initialization is still in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Context version chosen by the probe.
    pub fn context_version(&self) -> Option<ContextVersion> {
        self.context
    }

    /// Attach to a layout box of `width` x `height` pixels.
    ///
    /// Allocates the surface, probes synchronously and, if a context was
    /// found, starts asynchronous initialization. Mounting an already
    /// mounted graph tears the old mount down first.
    pub fn mount(&mut self, surface_id: SurfaceId, width: u32, height: u32) {
        if self.surface.is_some() {
            self.unmount();
        }
        self.mode = RendererMode::Uninitialized;

        let mut surface = Surface::new(surface_id, width, height);
        tracing::info!(
            surface = %surface.id(),
            width = surface.width(),
            height = surface.height(),
            "graph mounted"
        );

        if self.preference == RendererPreference::Software {
            self.mode = RendererMode::Fallback2D;
            self.surface = Some(surface);
            return;
        }

        match self.probe() {
            Some(version) => {
                surface.show_placeholder(LOADING_MESSAGE);
                self.context = Some(version);
                self.pending = Some(self.capability.initialize(surface.id(), version));
            },
            None => {
                tracing::warn!(surface = %surface.id(), "no accelerated context; graph unsupported");
                surface.show_placeholder(UNSUPPORTED_MESSAGE);
                self.mode = RendererMode::Unsupported;
            },
        }
        self.surface = Some(surface);
    }

    fn probe(&self) -> Option<ContextVersion> {
        ContextVersion::PRIORITY
            .into_iter()
            .find(|&version| self.capability.probe(version))
    }

    /// Observe initialization settlement. Returns the new mode on the tick
    /// it settles.
    pub fn poll_init(&mut self) -> Option<RendererMode> {
        let outcome = self.pending.as_ref()?.poll();
        match outcome {
            InitPoll::Pending => None,
            InitPoll::Ready(handle) => {
                self.pending = None;
                self.handle = Some(handle);
                self.mode = RendererMode::Accelerated;
                if let Some(surface) = self.surface.as_mut() {
                    surface.mark_external();
                    tracing::info!(surface = %surface.id(), "accelerated renderer ready");
                }
                Some(self.mode)
            },
            InitPoll::Failed(err) => {
                self.pending = None;
                self.mode = RendererMode::Fallback2D;
                if let Some(surface) = self.surface.as_mut() {
                    surface.clear();
                }
                tracing::warn!(error = %err, "accelerated renderer failed; using software fallback");
                Some(self.mode)
            },
        }
    }

    /// Render a sample series in the current mode.
    pub fn update_data(&mut self, samples: &[f64]) -> UpdateOutcome {
        let Some(surface) = self.surface.as_mut() else {
            return UpdateOutcome::NoSurface;
        };

        match self.mode {
            RendererMode::Accelerated => match self.handle.as_mut() {
                Some(handle) => {
                    let data: Vec<f32> = samples.iter().map(|&v| v as f32).collect();
                    handle.submit(&data, surface.width(), surface.height());
                    UpdateOutcome::Submitted
                },
                None => UpdateOutcome::Dropped,
            },
            RendererMode::Fallback2D => {
                draw_fallback(surface, samples);
                UpdateOutcome::Drawn
            },
            RendererMode::Uninitialized | RendererMode::Unsupported => {
                tracing::debug!(mode = self.mode.name(), len = samples.len(), "graph update dropped");
                UpdateOutcome::Dropped
            },
        }
    }

    /// Follow a new layout box without remounting. Returns true when the
    /// surface size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let before = (surface.width(), surface.height());
        surface.resize(width, height);
        before != (surface.width(), surface.height())
    }

    /// Tear down: release the renderer, abandon pending initialization,
    /// detach the surface. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            tracing::info!("accelerated renderer released");
        }
        if let Some(pending) = self.pending.take() {
            pending.abandon();
        }
        if let Some(surface) = self.surface.take() {
            tracing::debug!(surface = %surface.id(), "graph surface detached");
        }
        self.mode = RendererMode::Uninitialized;
        self.context = None;
    }
}

impl Drop for GraphComponent {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn draw_fallback(surface: &mut Surface, samples: &[f64]) {
    let geometry = plot_geometry(samples, surface.width() as f64, surface.height() as f64);

    surface.clear();
    for axis in [geometry.y_axis, geometry.x_axis] {
        surface.stroke_line(axis.from.x, axis.from.y, axis.to.x, axis.to.y);
    }

    let points: Vec<(f64, f64)> = geometry.points.iter().map(|p| (p.x, p.y)).collect();
    surface.stroke_polyline(&points);

    for tick in geometry.ticks {
        surface.fill_text(tick.label, PADDING - 5.0, tick.y + 4.0, TextAlign::Right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::fake::FakeCapability;
    use crate::surface::SurfaceContent;

    fn graph_with(cap: &Rc<FakeCapability>) -> GraphComponent {
        let cap: Rc<dyn RendererCapability> = cap.clone();
        GraphComponent::new(cap, RendererPreference::Auto)
    }

    fn id(n: u32) -> SurfaceId {
        SurfaceId::new(format!("stock-graph-{}", n))
    }

    #[test]
    fn update_without_surface_is_a_no_op() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        assert_eq!(graph.update_data(&[1.0, 2.0]), UpdateOutcome::NoSurface);
        assert_eq!(graph.mode(), RendererMode::Uninitialized);
    }

    #[test]
    fn mount_clamps_surface_and_probes_v2_first() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2, ContextVersion::V1]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 0, 0);

        let surface = graph.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (100, 100));
        assert_eq!(*cap.probes.borrow(), vec![ContextVersion::V2]);
        assert_eq!(*cap.initialized.borrow(), vec![(id(1), ContextVersion::V2)]);
        assert_eq!(
            surface.content(),
            &SurfaceContent::Placeholder(LOADING_MESSAGE.to_string())
        );
    }

    #[test]
    fn falls_back_to_v1_probe() {
        let cap = FakeCapability::supporting(&[ContextVersion::V1]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);
        assert_eq!(*cap.probes.borrow(), vec![ContextVersion::V2, ContextVersion::V1]);
        assert_eq!(graph.context_version(), Some(ContextVersion::V1));
    }

    #[test]
    fn updates_while_pending_are_dropped() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);

        assert_eq!(graph.update_data(&[1.0, 2.0]), UpdateOutcome::Dropped);
        cap.succeed_next();
        assert_eq!(graph.poll_init(), Some(RendererMode::Accelerated));
        assert!(cap.submissions().is_empty());
    }

    #[test]
    fn accelerated_mode_forwards_samples_unchanged() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 640, 320);
        assert_eq!(graph.poll_init(), None);
        cap.succeed_next();
        assert_eq!(graph.poll_init(), Some(RendererMode::Accelerated));
        assert_eq!(graph.poll_init(), None);

        assert_eq!(graph.update_data(&[100.0, 105.0, 102.0]), UpdateOutcome::Submitted);
        assert_eq!(cap.submissions(), vec![(vec![100.0, 105.0, 102.0], 640, 320)]);
        assert_eq!(graph.surface().unwrap().content(), &SurfaceContent::External);
    }

    #[test]
    fn construction_failure_settles_to_fallback() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);
        cap.fail_next("backend exploded");

        assert_eq!(graph.poll_init(), Some(RendererMode::Fallback2D));
        assert_eq!(graph.update_data(&[100.0, 105.0, 102.0]), UpdateOutcome::Drawn);

        let surface = graph.surface().unwrap();
        // x = 40, 200, 360 on a 400x200 surface; min at the bottom edge
        assert!(surface.is_set(40, 160));
        assert!(surface.is_set(200, 40));
        assert!(surface.is_set(360, 112));
        assert_eq!(surface.labels().len(), 5);
        assert_eq!(surface.labels()[0].text, "100.00");
        assert!(cap.submissions().is_empty());
    }

    #[test]
    fn missing_context_settles_to_unsupported_and_drops_updates() {
        let cap = FakeCapability::none();
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);

        assert_eq!(graph.mode(), RendererMode::Unsupported);
        assert!(cap.initialized.borrow().is_empty());
        assert_eq!(graph.update_data(&[1.0, 2.0, 3.0]), UpdateOutcome::Dropped);
        assert_eq!(graph.surface().unwrap().lit_pixels().count(), 0);
    }

    #[test]
    fn software_preference_skips_the_probe() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let cap_dyn: Rc<dyn RendererCapability> = cap.clone();
        let mut graph = GraphComponent::new(cap_dyn, RendererPreference::Software);
        graph.mount(id(1), 400, 200);

        assert_eq!(graph.mode(), RendererMode::Fallback2D);
        assert!(cap.probes.borrow().is_empty());
        assert_eq!(graph.update_data(&[3.0]), UpdateOutcome::Drawn);
        // a single sample draws axes only
        let surface = graph.surface().unwrap();
        assert!(surface.is_set(40, 40));
        assert!(!surface.is_set(200, 100));
    }

    #[test]
    fn teardown_releases_once_and_is_repeatable() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);
        cap.succeed_next();
        graph.poll_init();

        graph.unmount();
        graph.unmount();
        drop(graph);
        assert_eq!(cap.releases(), 1);
    }

    #[test]
    fn teardown_without_handle_is_safe() {
        let cap = FakeCapability::none();
        let mut graph = graph_with(&cap);
        graph.unmount();
        graph.mount(id(1), 400, 200);
        graph.unmount();
        assert!(!graph.is_mounted());
        assert_eq!(graph.mode(), RendererMode::Uninitialized);
        assert_eq!(cap.releases(), 0);
    }

    #[test]
    fn handle_settling_after_teardown_is_released() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);
        graph.unmount();

        cap.succeed_next();
        assert_eq!(cap.releases(), 1);
        assert_eq!(graph.poll_init(), None);
        assert_eq!(graph.mode(), RendererMode::Uninitialized);
    }

    #[test]
    fn remount_reenters_uninitialized_with_fresh_surface() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        graph.mount(id(1), 400, 200);
        cap.succeed_next();
        graph.poll_init();

        graph.mount(id(2), 400, 200);
        assert_eq!(cap.releases(), 1);
        assert_eq!(graph.mode(), RendererMode::Uninitialized);
        assert!(graph.is_pending());
        assert_eq!(graph.surface().unwrap().id(), &id(2));
    }

    #[test]
    fn resize_keeps_mode() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut graph = graph_with(&cap);
        assert!(!graph.resize(10, 10));
        graph.mount(id(1), 400, 200);
        cap.succeed_next();
        graph.poll_init();

        assert!(graph.resize(800, 300));
        assert!(!graph.resize(800, 300));
        assert_eq!(graph.mode(), RendererMode::Accelerated);
        graph.update_data(&[1.0]);
        assert_eq!(cap.submissions(), vec![(vec![1.0], 800, 300)]);
    }
}

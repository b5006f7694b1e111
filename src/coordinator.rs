//! Wiring between the data source, the table and the graph.
//!
//! The coordinator owns both components. It listens for table selections
//! through an explicit subscription, waits for both components to be
//! defined before the first fetch, and refreshes on a fixed interval.
//!
//! Everything runs on the UI thread. [`Coordinator::tick`] is called once
//! per loop iteration before drawing and [`Coordinator::frame`] once after,
//! which makes `frame` the frame boundary deferred graph updates wait for.

use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use crate::config::Config;
use crate::feed::QuoteSource;
use crate::graph::{GraphComponent, RendererMode, UpdateOutcome};
use crate::history::PriceHistory;
use crate::model::{find_record, serialize_snapshot, Snapshot, StockRecord};
use crate::registry::{ComponentKind, ComponentRegistry};
use crate::renderer::RendererCapability;
use crate::table::{SelectionChanged, TableComponent};

const REQUIRED: [ComponentKind; 2] = [ComponentKind::StockTable, ComponentKind::StockGraph];

/// Samples the graph should show for `symbol`: its recorded history, or
/// the current price alone when nothing was recorded. `None` when the
/// snapshot has no such symbol.
pub fn samples_for(
    history: &PriceHistory,
    snapshot: &[StockRecord],
    symbol: &str,
) -> Option<Vec<f64>> {
    let record = find_record(snapshot, symbol)?;
    let samples = history.samples(symbol);
    if samples.is_empty() {
        Some(vec![record.price])
    } else {
        Some(samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferStage {
    AwaitingDefinition,
    AwaitingFrame,
}

/// A graph update that arrived before the graph could take it.
#[derive(Debug)]
struct DeferredUpdate {
    symbol: String,
    samples: Vec<f64>,
    stage: DeferStage,
}

/// Owns the components and drives the refresh cycle.
#[derive(Debug)]
pub struct Coordinator {
    registry: ComponentRegistry,
    table: TableComponent,
    graph: GraphComponent,
    source: Box<dyn QuoteSource>,
    history: PriceHistory,
    snapshot: Snapshot,
    selections: Receiver<SelectionChanged>,
    deferred: Option<DeferredUpdate>,
    config: Config,
    started: bool,
    last_fetch: Option<Instant>,
    last_error: Option<String>,
    fetches: u64,
}

impl Coordinator {
    /// Build the table and graph through `registry` and subscribe to
    /// selections. Nothing is fetched until both components are defined.
    pub fn new(
        registry: ComponentRegistry,
        capability: Rc<dyn RendererCapability>,
        source: Box<dyn QuoteSource>,
        config: Config,
    ) -> Self {
        let mut table = registry.create_table();
        let graph = registry.create_graph(capability, config.renderer);

        let (tx, selections) = mpsc::channel();
        table.on_selection_changed(Box::new(move |event| {
            // The receiver lives as long as the coordinator.
            let _ = tx.send(event.clone());
        }));

        Self {
            registry,
            table,
            graph,
            source,
            history: PriceHistory::new(config.history_capacity),
            snapshot: Vec::new(),
            selections,
            deferred: None,
            config,
            started: false,
            last_fetch: None,
            last_error: None,
            fetches: 0,
        }
    }

    /// The table.
    pub fn table(&self) -> &TableComponent {
        &self.table
    }

    /// The table, mutably (for input handling).
    pub fn table_mut(&mut self) -> &mut TableComponent {
        &mut self.table
    }

    /// The graph.
    pub fn graph(&self) -> &GraphComponent {
        &self.graph
    }

    /// The component registry.
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Last successfully fetched snapshot.
    pub fn snapshot(&self) -> &[StockRecord] {
        &self.snapshot
    }

    /// Recorded price history.
    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Message of the most recent failed fetch, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Successful fetches so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    /// Whether the refresh cycle has started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether a graph update is waiting for the graph.
    pub fn has_deferred_update(&self) -> bool {
        self.deferred.is_some()
    }

    /// Advance the event loop: settle the renderer, start or continue the
    /// refresh cycle, deliver selections.
    pub fn tick(&mut self, now: Instant) {
        if let Some(mode) = self.graph.poll_init() {
            tracing::info!(mode = mode.name(), "graph renderer settled");
            if mode != RendererMode::Unsupported {
                self.push_current_selection();
            }
        }

        if !self.started {
            if !self.registry.all_defined(&REQUIRED) {
                return;
            }
            self.started = true;
            tracing::info!("components defined; starting refresh cycle");
            self.refresh(now);
        } else if self.refresh_due(now) {
            self.refresh(now);
        }

        self.drain_selections();

        if let Some(deferred) = self.deferred.as_mut() {
            if deferred.stage == DeferStage::AwaitingDefinition
                && self.registry.is_defined(ComponentKind::StockGraph)
            {
                deferred.stage = DeferStage::AwaitingFrame;
            }
        }
    }

    /// Frame boundary: retry a deferred graph update exactly once.
    pub fn frame(&mut self) {
        let Some(deferred) = self.deferred.take() else {
            return;
        };
        if deferred.stage == DeferStage::AwaitingDefinition {
            self.deferred = Some(deferred);
            return;
        }

        match self.graph.update_data(&deferred.samples) {
            UpdateOutcome::NoSurface => {
                tracing::debug!(symbol = %deferred.symbol, "graph still not ready; update dropped");
            },
            outcome => {
                tracing::debug!(symbol = %deferred.symbol, ?outcome, "deferred graph update retried");
            },
        }
    }

    /// Fetch now, outside the interval. Ignored before the cycle starts.
    pub fn force_refresh(&mut self, now: Instant) {
        if self.started {
            self.refresh(now);
            self.drain_selections();
        }
    }

    /// Give the graph its layout box, in terminal cells. Mounts on first
    /// call once the graph is defined; later calls follow size changes.
    pub fn layout_graph(&mut self, cols: u16, rows: u16) {
        if !self.registry.is_defined(ComponentKind::StockGraph) {
            return;
        }
        let (width, height) = self.config.layout_pixels(cols, rows);

        if !self.graph.is_mounted() {
            let surface_id = self.registry.next_surface_id();
            self.graph.mount(surface_id, width, height);
            if self.graph.mode() == RendererMode::Fallback2D && self.deferred.is_none() {
                self.push_current_selection();
            }
        } else if self.graph.resize(width, height) {
            self.push_current_selection();
        }
    }

    /// Tear the graph down.
    pub fn shutdown(&mut self) {
        self.graph.unmount();
    }

    fn refresh_due(&self, now: Instant) -> bool {
        self.last_fetch
            .map_or(true, |t| now.saturating_duration_since(t) >= self.config.refresh_interval)
    }

    fn refresh(&mut self, now: Instant) {
        self.last_fetch = Some(now);

        let snapshot = match self.source.fetch() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch stock data");
                self.last_error = Some(e.to_string());
                return;
            },
        };
        let text = match serialize_snapshot(&snapshot) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize snapshot");
                self.last_error = Some(e.to_string());
                return;
            },
        };

        tracing::info!(rows = snapshot.len(), "snapshot fetched");
        self.history.record(&snapshot);
        self.snapshot = snapshot;
        self.fetches += 1;
        self.last_error = None;

        let previous = self.table.selected().map(str::to_owned);
        self.table.set_data_attribute(&text);

        // An unchanged selection emits nothing, but its history just grew.
        if previous.is_some() && previous.as_deref() == self.table.selected() {
            self.push_current_selection();
        }
    }

    fn drain_selections(&mut self) {
        while let Ok(event) = self.selections.try_recv() {
            self.handle_selection(&event);
        }
    }

    fn handle_selection(&mut self, event: &SelectionChanged) {
        match samples_for(&self.history, &self.snapshot, &event.symbol) {
            Some(samples) => self.push_samples(event.symbol.clone(), samples),
            None => tracing::debug!(symbol = %event.symbol, "selected symbol not in snapshot"),
        }
    }

    fn push_current_selection(&mut self) {
        let Some(symbol) = self.table.selected().map(str::to_owned) else {
            return;
        };
        if let Some(samples) = samples_for(&self.history, &self.snapshot, &symbol) {
            self.push_samples(symbol, samples);
        }
    }

    fn push_samples(&mut self, symbol: String, samples: Vec<f64>) {
        if self.graph.is_mounted() {
            self.graph.update_data(&samples);
            return;
        }
        tracing::debug!(symbol = %symbol, "graph not ready; deferring update");
        self.deferred = Some(DeferredUpdate {
            symbol,
            samples,
            stage: DeferStage::AwaitingDefinition,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TickerError};
    use crate::graph::RendererPreference;
    use crate::renderer::fake::FakeCapability;
    use crate::renderer::ContextVersion;
    use crate::surface::SurfaceContent;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::time::Duration;

    #[derive(Debug)]
    struct ScriptedSource {
        results: VecDeque<Result<Snapshot>>,
        calls: Rc<Cell<usize>>,
    }

    impl QuoteSource for ScriptedSource {
        fn fetch(&mut self) -> Result<Snapshot> {
            self.calls.set(self.calls.get() + 1);
            self.results
                .pop_front()
                .unwrap_or_else(|| Err(TickerError::fetch("script exhausted")))
        }
    }

    fn rec(symbol: &str, price: f64, change: f64) -> StockRecord {
        StockRecord::new(symbol, symbol, price, change)
    }

    struct Harness {
        coordinator: Coordinator,
        calls: Rc<Cell<usize>>,
    }

    fn harness(
        cap: &Rc<FakeCapability>,
        results: Vec<Result<Snapshot>>,
        defined: bool,
        renderer: RendererPreference,
    ) -> Harness {
        let mut registry = ComponentRegistry::new();
        if defined {
            registry.define(ComponentKind::StockTable);
            registry.define(ComponentKind::StockGraph);
        }
        let calls = Rc::new(Cell::new(0));
        let source = ScriptedSource {
            results: results.into(),
            calls: Rc::clone(&calls),
        };
        let config = Config {
            renderer,
            ..Config::default()
        };
        let cap: Rc<dyn RendererCapability> = cap.clone();
        Harness {
            coordinator: Coordinator::new(registry, cap, Box::new(source), config),
            calls,
        }
    }

    #[test]
    fn samples_for_prefers_history() {
        let snapshot = vec![rec("AAPL", 150.0, 1.2)];
        let mut history = PriceHistory::new(5);
        assert_eq!(samples_for(&history, &snapshot, "AAPL"), Some(vec![150.0]));
        history.record(&[rec("AAPL", 140.0, 0.0)]);
        history.record(&snapshot);
        assert_eq!(samples_for(&history, &snapshot, "AAPL"), Some(vec![140.0, 150.0]));
        assert_eq!(samples_for(&history, &snapshot, "MSFT"), None);
    }

    #[test]
    fn first_fetch_waits_for_definitions() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut h = harness(
            &cap,
            vec![Ok(vec![rec("AAPL", 150.0, 1.2)])],
            false,
            RendererPreference::Auto,
        );
        let t0 = Instant::now();

        h.coordinator.tick(t0);
        h.coordinator.registry_mut().define(ComponentKind::StockTable);
        h.coordinator.tick(t0);
        assert_eq!(h.calls.get(), 0);
        assert!(!h.coordinator.is_started());

        h.coordinator.registry_mut().define(ComponentKind::StockGraph);
        h.coordinator.tick(t0);
        assert_eq!(h.calls.get(), 1);
        assert_eq!(h.coordinator.table().selected(), Some("AAPL"));
    }

    #[test]
    fn first_fetch_does_not_wait_for_renderer() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut h = harness(
            &cap,
            vec![Ok(vec![rec("AAPL", 150.0, 1.2)])],
            true,
            RendererPreference::Auto,
        );
        h.coordinator.layout_graph(50, 25);
        h.coordinator.tick(Instant::now());
        assert!(h.coordinator.graph().is_pending());
        assert_eq!(h.coordinator.fetch_count(), 1);
    }

    #[test]
    fn selection_before_mount_is_retried_after_one_frame() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut h = harness(
            &cap,
            vec![Ok(vec![rec("AAPL", 150.0, 1.2), rec("MSFT", 300.0, -0.5)])],
            true,
            RendererPreference::Software,
        );
        h.coordinator.tick(Instant::now());
        assert!(h.coordinator.has_deferred_update());

        h.coordinator.layout_graph(50, 25);
        h.coordinator.frame();
        assert!(!h.coordinator.has_deferred_update());
        let surface = h.coordinator.graph().surface().unwrap();
        assert_eq!(surface.content(), &SurfaceContent::Drawing);
        assert_eq!(surface.labels()[0].text, "150.00");
    }

    #[test]
    fn deferred_update_is_retried_only_once() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut h = harness(
            &cap,
            vec![Ok(vec![rec("AAPL", 150.0, 1.2)])],
            true,
            RendererPreference::Auto,
        );
        h.coordinator.tick(Instant::now());
        h.coordinator.frame();
        assert!(!h.coordinator.has_deferred_update());

        h.coordinator.layout_graph(50, 25);
        cap.succeed_next();
        h.coordinator.frame();
        assert!(cap.submissions().is_empty());
    }

    #[test]
    fn settled_renderer_receives_current_selection() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut h = harness(
            &cap,
            vec![
                Ok(vec![rec("AAPL", 150.0, 1.2), rec("MSFT", 300.0, -0.5)]),
                Ok(vec![rec("MSFT", 310.0, 0.2)]),
            ],
            true,
            RendererPreference::Auto,
        );
        let t0 = Instant::now();
        h.coordinator.tick(t0);
        h.coordinator.layout_graph(50, 25);
        h.coordinator.frame();
        assert!(cap.submissions().is_empty());

        cap.succeed_next();
        h.coordinator.tick(t0 + Duration::from_secs(1));
        assert_eq!(cap.submissions(), vec![(vec![150.0], 400, 400)]);

        h.coordinator.tick(t0 + Duration::from_secs(60));
        assert_eq!(h.coordinator.table().selected(), Some("MSFT"));
        let submissions = cap.submissions();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[1], (vec![300.0, 310.0], 400, 400));
    }

    #[test]
    fn refresh_repushes_unchanged_selection() {
        let cap = FakeCapability::supporting(&[ContextVersion::V2]);
        let mut h = harness(
            &cap,
            vec![Ok(vec![rec("AAPL", 1.0, 0.0)]), Ok(vec![rec("AAPL", 2.0, 0.0)])],
            true,
            RendererPreference::Auto,
        );
        let t0 = Instant::now();
        h.coordinator.layout_graph(50, 25);
        cap.succeed_next();
        h.coordinator.tick(t0);
        h.coordinator.tick(t0 + Duration::from_secs(60));

        let last = cap.submissions().pop().unwrap();
        assert_eq!(last.0, vec![1.0, 2.0]);
    }

    #[test]
    fn fetch_failure_keeps_snapshot_and_interval() {
        let cap = FakeCapability::none();
        let mut h = harness(
            &cap,
            vec![
                Ok(vec![rec("AAPL", 150.0, 1.2)]),
                Err(TickerError::fetch("network down")),
                Ok(vec![rec("NVDA", 900.0, 2.0)]),
            ],
            true,
            RendererPreference::Auto,
        );
        let t0 = Instant::now();
        h.coordinator.tick(t0);
        h.coordinator.tick(t0 + Duration::from_secs(30));
        assert_eq!(h.calls.get(), 1);

        h.coordinator.tick(t0 + Duration::from_secs(60));
        assert_eq!(h.calls.get(), 2);
        assert_eq!(h.coordinator.snapshot()[0].symbol, "AAPL");
        assert_eq!(h.coordinator.table().rows()[0].symbol, "AAPL");
        assert!(h.coordinator.last_error().unwrap().contains("network down"));

        h.coordinator.tick(t0 + Duration::from_secs(120));
        assert_eq!(h.calls.get(), 3);
        assert_eq!(h.coordinator.table().selected(), Some("NVDA"));
        assert!(h.coordinator.last_error().is_none());
    }

    #[test]
    fn unsupported_graph_ignores_selections() {
        let cap = FakeCapability::none();
        let mut h = harness(
            &cap,
            vec![Ok(vec![rec("AAPL", 150.0, 1.2), rec("MSFT", 300.0, -0.5)])],
            true,
            RendererPreference::Auto,
        );
        h.coordinator.layout_graph(50, 25);
        h.coordinator.tick(Instant::now());
        assert_eq!(h.coordinator.graph().mode(), RendererMode::Unsupported);

        h.coordinator.table_mut().select("MSFT");
        h.coordinator.tick(Instant::now());
        assert!(!h.coordinator.has_deferred_update());
        let surface = h.coordinator.graph().surface().unwrap();
        assert_eq!(surface.lit_pixels().count(), 0);
    }

    #[test]
    fn shutdown_releases_renderer() {
        let cap = FakeCapability::supporting(&[ContextVersion::V1]);
        let mut h = harness(&cap, Vec::new(), true, RendererPreference::Auto);
        h.coordinator.layout_graph(50, 25);
        cap.succeed_next();
        h.coordinator.tick(Instant::now());
        h.coordinator.shutdown();
        drop(h);
        assert_eq!(cap.releases(), 1);
    }
}

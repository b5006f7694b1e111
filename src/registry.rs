//! Component definitions and construction.
//!
//! Stands in for a process-wide element registry: each coordinator owns
//! one, so independent coordinators (and tests) never share state.

use std::collections::HashSet;
use std::rc::Rc;

use crate::graph::{GraphComponent, RendererPreference};
use crate::renderer::RendererCapability;
use crate::surface::SurfaceId;
use crate::table::TableComponent;

/// Kinds of component the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// The quote table.
    StockTable,
    /// The price graph.
    StockGraph,
}

impl ComponentKind {
    /// Registered tag name.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::StockTable => "stock-table",
            ComponentKind::StockGraph => "stock-graph",
        }
    }
}

/// Tracks which components are defined and builds them.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    defined: HashSet<ComponentKind>,
    surfaces_issued: u64,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a component kind. Returns false if it was already defined.
    pub fn define(&mut self, kind: ComponentKind) -> bool {
        let added = self.defined.insert(kind);
        if added {
            tracing::debug!(tag = kind.tag(), "component defined");
        }
        added
    }

    /// Whether `kind` is defined.
    pub fn is_defined(&self, kind: ComponentKind) -> bool {
        self.defined.contains(&kind)
    }

    /// Whether every kind in `kinds` is defined.
    pub fn all_defined(&self, kinds: &[ComponentKind]) -> bool {
        kinds.iter().all(|k| self.is_defined(*k))
    }

    /// Build a table.
    pub fn create_table(&self) -> TableComponent {
        TableComponent::new()
    }

    /// Build an unmounted graph.
    pub fn create_graph(
        &self,
        capability: Rc<dyn RendererCapability>,
        preference: RendererPreference,
    ) -> GraphComponent {
        GraphComponent::new(capability, preference)
    }

    /// Issue a surface id that has never been handed out by this registry.
    pub fn next_surface_id(&mut self) -> SurfaceId {
        self.surfaces_issued += 1;
        SurfaceId::new(format!(
            "{}-{}",
            ComponentKind::StockGraph.tag(),
            self.surfaces_issued
        ))
    }
}

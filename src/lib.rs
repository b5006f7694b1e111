//! Tickerview - a terminal stock quote viewer.
//!
//! Tickerview refreshes a snapshot of quotes on an interval, lists them in a
//! selectable table and graphs the selected symbol's price history. The graph
//! probes for an accelerated chart renderer and falls back to a software
//! surface when none is available or when asked to.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Instant;
//! use tickerview::config::Config;
//! use tickerview::coordinator::Coordinator;
//! use tickerview::feed::MockFeed;
//! use tickerview::registry::{ComponentKind, ComponentRegistry};
//! use tickerview::renderer::{SharedScene, TerminalChartCapability};
//! use tickerview::renderer::chart::TerminalEnv;
//!
//! let capability = TerminalChartCapability::new(TerminalEnv::from_env(), SharedScene::default());
//! let mut coordinator = Coordinator::new(
//!     ComponentRegistry::new(),
//!     Rc::new(capability),
//!     Box::new(MockFeed::new(7)),
//!     Config::default(),
//! );
//! coordinator.registry_mut().define(ComponentKind::StockTable);
//! coordinator.registry_mut().define(ComponentKind::StockGraph);
//! coordinator.tick(Instant::now());
//! println!("{} quotes", coordinator.snapshot().len());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod feed;
pub mod graph;
pub mod history;
pub mod model;
pub mod plot;
pub mod registry;
pub mod renderer;
pub mod report;
pub mod surface;
pub mod table;
pub mod ui;

pub use error::{Result, TickerError};

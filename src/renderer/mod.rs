//! Accelerated renderer capability.
//!
//! The graph component reaches its accelerated backend only through the
//! traits in this module: a synchronous context probe, an asynchronous
//! construction bound to a surface id, and a handle that accepts sample
//! submissions until it is released.
//!
//! Construction settles through a channel. The backend holds the
//! [`InitCompleter`] and the graph holds the [`PendingInit`], polling it
//! once per event-loop tick. A handle that arrives after the graph gave up
//! on it is released on the spot, so a handle can never outlive its owner.

pub mod chart;

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::error::{Result, TickerError};
use crate::surface::SurfaceId;

pub use chart::{ChartScene, SharedScene, TerminalChartCapability};

/// Accelerated context versions, in probe priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextVersion {
    /// Higher-fidelity context.
    V2,
    /// Lower-fidelity context.
    V1,
}

impl ContextVersion {
    /// Versions in the order they are probed.
    pub const PRIORITY: [ContextVersion; 2] = [ContextVersion::V2, ContextVersion::V1];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ContextVersion::V2 => "v2",
            ContextVersion::V1 => "v1",
        }
    }
}

/// A live accelerated renderer bound to one surface.
pub trait RendererHandle: Send + fmt::Debug {
    /// Draw `samples` on a `width` x `height` pixel surface.
    fn submit(&mut self, samples: &[f32], width: u32, height: u32);

    /// Free backend resources. Further calls are no-ops.
    fn release(&mut self);
}

/// Factory side of an accelerated backend.
pub trait RendererCapability: fmt::Debug {
    /// Whether a context of `version` can be obtained right now.
    fn probe(&self, version: ContextVersion) -> bool;

    /// Start constructing a renderer for `surface`.
    fn initialize(&self, surface: &SurfaceId, version: ContextVersion) -> PendingInit;
}

type InitResult = Result<Box<dyn RendererHandle>>;

/// Outcome of polling a pending initialization.
#[derive(Debug)]
pub enum InitPoll {
    /// Not settled yet.
    Pending,
    /// Construction succeeded.
    Ready(Box<dyn RendererHandle>),
    /// Construction failed, or the backend abandoned it.
    Failed(TickerError),
}

/// Graph-side end of an in-flight initialization.
#[derive(Debug)]
pub struct PendingInit {
    surface: SurfaceId,
    rx: Receiver<InitResult>,
}

/// Backend-side end of an in-flight initialization.
#[derive(Debug)]
pub struct InitCompleter {
    surface: SurfaceId,
    tx: Sender<InitResult>,
}

impl PendingInit {
    /// Create a connected completer/pending pair for `surface`.
    pub fn channel(surface: SurfaceId) -> (InitCompleter, PendingInit) {
        let (tx, rx) = mpsc::channel();
        (
            InitCompleter {
                surface: surface.clone(),
                tx,
            },
            PendingInit { surface, rx },
        )
    }

    /// Surface this initialization is bound to.
    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    /// Check for settlement without blocking.
    pub fn poll(&self) -> InitPoll {
        match self.rx.try_recv() {
            Ok(Ok(handle)) => InitPoll::Ready(handle),
            Ok(Err(err)) => InitPoll::Failed(err),
            Err(TryRecvError::Empty) => InitPoll::Pending,
            Err(TryRecvError::Disconnected) => InitPoll::Failed(TickerError::renderer_init(
                self.surface.as_str(),
                "backend dropped the initialization",
            )),
        }
    }

    /// Give up on this initialization, releasing a handle that already arrived.
    pub fn abandon(self) {
        if let InitPoll::Ready(mut handle) = self.poll() {
            tracing::info!(surface = %self.surface, "releasing renderer that settled after teardown");
            handle.release();
        }
    }
}

impl InitCompleter {
    /// Surface this initialization is bound to.
    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    /// Deliver a constructed handle. If nobody is waiting any more the
    /// handle is released immediately.
    pub fn succeed(self, handle: Box<dyn RendererHandle>) {
        if let Err(mpsc::SendError(Ok(mut orphan))) = self.tx.send(Ok(handle)) {
            tracing::info!(surface = %self.surface, "surface gone before renderer settled; releasing");
            orphan.release();
        }
    }

    /// Report a construction failure.
    pub fn fail(self, reason: impl Into<String>) {
        let err = TickerError::renderer_init(self.surface.as_str(), reason);
        // Nobody listening means the surface is already torn down.
        let _ = self.tx.send(Err(err));
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted backend for exercising the graph state machine.

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    /// Shared record of what fake handles saw.
    #[derive(Debug, Default)]
    pub(crate) struct FakeLog {
        pub(crate) submissions: Vec<(Vec<f32>, u32, u32)>,
        pub(crate) releases: usize,
    }

    #[derive(Debug)]
    pub(crate) struct FakeHandle {
        log: Arc<Mutex<FakeLog>>,
        released: bool,
    }

    impl RendererHandle for FakeHandle {
        fn submit(&mut self, samples: &[f32], width: u32, height: u32) {
            self.log
                .lock()
                .unwrap()
                .submissions
                .push((samples.to_vec(), width, height));
        }

        fn release(&mut self) {
            if !self.released {
                self.released = true;
                self.log.lock().unwrap().releases += 1;
            }
        }
    }

    /// A capability whose probe results and settlement are driven by the test.
    #[derive(Debug, Default)]
    pub(crate) struct FakeCapability {
        pub(crate) supported: Vec<ContextVersion>,
        pub(crate) probes: RefCell<Vec<ContextVersion>>,
        pub(crate) initialized: RefCell<Vec<(SurfaceId, ContextVersion)>>,
        completers: RefCell<Vec<InitCompleter>>,
        pub(crate) log: Arc<Mutex<FakeLog>>,
    }

    impl FakeCapability {
        pub(crate) fn supporting(versions: &[ContextVersion]) -> Rc<Self> {
            Rc::new(Self {
                supported: versions.to_vec(),
                ..Self::default()
            })
        }

        pub(crate) fn none() -> Rc<Self> {
            Self::supporting(&[])
        }

        /// Settle the oldest pending initialization with a handle.
        pub(crate) fn succeed_next(&self) {
            let completer = self.completers.borrow_mut().remove(0);
            completer.succeed(Box::new(FakeHandle {
                log: Arc::clone(&self.log),
                released: false,
            }));
        }

        /// Settle the oldest pending initialization with an error.
        pub(crate) fn fail_next(&self, reason: &str) {
            let completer = self.completers.borrow_mut().remove(0);
            completer.fail(reason);
        }

        /// Drop the oldest completer without settling it.
        pub(crate) fn abandon_next(&self) {
            drop(self.completers.borrow_mut().remove(0));
        }

        pub(crate) fn submissions(&self) -> Vec<(Vec<f32>, u32, u32)> {
            self.log.lock().unwrap().submissions.clone()
        }

        pub(crate) fn releases(&self) -> usize {
            self.log.lock().unwrap().releases
        }
    }

    impl RendererCapability for FakeCapability {
        fn probe(&self, version: ContextVersion) -> bool {
            self.probes.borrow_mut().push(version);
            self.supported.contains(&version)
        }

        fn initialize(&self, surface: &SurfaceId, version: ContextVersion) -> PendingInit {
            self.initialized
                .borrow_mut()
                .push((surface.clone(), version));
            let (completer, pending) = PendingInit::channel(surface.clone());
            self.completers.borrow_mut().push(completer);
            pending
        }
    }
}

//! The reload orchestrator: one unload-then-load cycle per reload event.

use std::sync::Arc;

use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::runtime::{image::RuntimeImage, registry::Channel};
use crate::Error;

/// Phase of the reload state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ReloadPhase {
    /// No cycle in progress.
    Idle,
    /// Invoking the unload channel across all registries.
    Unloading,
    /// Waiting on the collection barrier between unload and load.
    BarrierWait,
    /// Invoking the load channel across all registries.
    Loading,
}

/// Outcome of one reload cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Both phases ran to completion.
    Completed,
    /// The cycle was abandoned; the failure was reported to the diagnostic
    /// sink. The process may be left in a partially-reset state, and the
    /// host can retry by triggering another cycle.
    Failed,
}

/// Host-provided collection barrier run between the unload and load phases.
///
/// The barrier must force reclamation of objects only reachable from storage
/// just blanked and wait for deferred finalization, so side effects of
/// releasing old static state run before reinitialization.
pub trait CollectionBarrier: Send + Sync {
    /// Runs the barrier to completion.
    fn collect(&self);
}

/// A barrier that does nothing, for hosts without deferred reclamation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBarrier;

impl CollectionBarrier for NoopBarrier {
    fn collect(&self) {}
}

/// Host-invoked entry point running the two-phase reload cycle with failure
/// containment.
///
/// A cycle is expected to run on a single orchestrating thread per reload
/// event; no protection exists against two concurrent cycles. The host
/// environment guarantees single-threaded triggering.
///
/// # Examples
///
/// ```rust
/// use cilreset::diagnostics::Diagnostics;
/// use cilreset::runtime::{ReloadOrchestrator, ReloadOutcome};
/// use std::sync::Arc;
///
/// let diagnostics = Arc::new(Diagnostics::new());
/// let mut orchestrator = ReloadOrchestrator::new(Arc::clone(&diagnostics));
/// assert_eq!(orchestrator.reload_dirty_types(), ReloadOutcome::Completed);
/// ```
pub struct ReloadOrchestrator {
    images: Vec<Arc<RuntimeImage>>,
    barrier: Box<dyn CollectionBarrier>,
    diagnostics: Arc<Diagnostics>,
    phase: ReloadPhase,
}

impl ReloadOrchestrator {
    /// Creates an orchestrator reporting to the given diagnostic sink, with
    /// a no-op barrier.
    #[must_use]
    pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            images: Vec::new(),
            barrier: Box::new(NoopBarrier),
            diagnostics,
            phase: ReloadPhase::Idle,
        }
    }

    /// Replaces the collection barrier.
    #[must_use]
    pub fn with_barrier(mut self, barrier: Box<dyn CollectionBarrier>) -> Self {
        self.barrier = barrier;
        self
    }

    /// Adds a loaded image to the reload set.
    pub fn add_image(&mut self, image: Arc<RuntimeImage>) {
        self.images.push(image);
    }

    /// Current phase of the state machine.
    #[must_use]
    pub fn phase(&self) -> ReloadPhase {
        self.phase
    }

    /// Runs one full reload cycle synchronously: unload all registries,
    /// collection barrier, load all registries.
    ///
    /// Any error raised in a phase is caught here, reported to the
    /// diagnostic sink with a "reload failed" marker, and the cycle is
    /// abandoned back to [`ReloadPhase::Idle`] rather than retried.
    /// Callable within the automatic trigger or on demand from a manual
    /// command.
    pub fn reload_dirty_types(&mut self) -> ReloadOutcome {
        self.phase = ReloadPhase::Unloading;
        for image in &self.images {
            if let Err(error) = image.registry().invoke(Channel::Unload) {
                return self.abandon(&error);
            }
        }

        self.phase = ReloadPhase::BarrierWait;
        self.barrier.collect();

        self.phase = ReloadPhase::Loading;
        for image in &self.images {
            if let Err(error) = image.registry().invoke(Channel::Load) {
                return self.abandon(&error);
            }
        }

        self.phase = ReloadPhase::Idle;
        ReloadOutcome::Completed
    }

    fn abandon(&mut self, error: &Error) -> ReloadOutcome {
        self.diagnostics.error(
            DiagnosticCategory::Reload,
            format!("reload failed during {} phase: {error}", self.phase),
        );
        self.phase = ReloadPhase::Idle;
        ReloadOutcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::registry::Channel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingBarrier {
        trace: Arc<Mutex<Vec<&'static str>>>,
    }

    impl CollectionBarrier for RecordingBarrier {
        fn collect(&self) {
            self.trace.lock().unwrap().push("barrier");
        }
    }

    fn empty_image() -> Arc<RuntimeImage> {
        RuntimeImage::load(crate::metadata::module::Module::new("Game.Core"))
    }

    #[test]
    fn test_barrier_runs_between_phases() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let image = empty_image();

        let unload_trace = Arc::clone(&trace);
        image.registry().register(
            Channel::Unload,
            Arc::new(move || {
                unload_trace.lock().unwrap().push("unload");
                Ok(())
            }),
        );
        let load_trace = Arc::clone(&trace);
        image.registry().register(
            Channel::Load,
            Arc::new(move || {
                load_trace.lock().unwrap().push("load");
                Ok(())
            }),
        );

        let diagnostics = Arc::new(Diagnostics::new());
        let mut orchestrator = ReloadOrchestrator::new(diagnostics)
            .with_barrier(Box::new(RecordingBarrier {
                trace: Arc::clone(&trace),
            }));
        orchestrator.add_image(image);

        assert_eq!(orchestrator.reload_dirty_types(), ReloadOutcome::Completed);
        assert_eq!(orchestrator.phase(), ReloadPhase::Idle);
        assert_eq!(*trace.lock().unwrap(), vec!["unload", "barrier", "load"]);
    }

    #[test]
    fn test_unload_failure_skips_load_phase() {
        let image = empty_image();
        image.registry().register(
            Channel::Unload,
            Arc::new(|| {
                Err(Error::CallbackFailed {
                    message: "unload raised".to_string(),
                })
            }),
        );
        let load_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&load_calls);
        image.registry().register(
            Channel::Load,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let diagnostics = Arc::new(Diagnostics::new());
        let mut orchestrator = ReloadOrchestrator::new(Arc::clone(&diagnostics));
        orchestrator.add_image(image);

        assert_eq!(orchestrator.reload_dirty_types(), ReloadOutcome::Failed);
        assert_eq!(orchestrator.phase(), ReloadPhase::Idle);
        assert_eq!(load_calls.load(Ordering::SeqCst), 0);
        assert!(diagnostics.has_errors());
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("reload failed during Unloading")));
    }

    #[test]
    fn test_empty_orchestrator_completes() {
        let diagnostics = Arc::new(Diagnostics::new());
        let mut orchestrator = ReloadOrchestrator::new(diagnostics);
        assert_eq!(orchestrator.reload_dirty_types(), ReloadOutcome::Completed);
    }
}

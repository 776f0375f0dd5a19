//! The per-module runtime dispatch registry.
//!
//! One registry exists per loaded module, holding two composable action
//! chains: the unload channel and the load channel. Type initializers of
//! eligible types register their synthesized units here on first execution;
//! the reload orchestrator invokes whole channels once per reload event.
//!
//! Registration is lock-free. Distinct generic instantiations of the same
//! open type may have their initializers run concurrently on different
//! execution threads, all registering into the same module-level composite; a
//! naive read-modify-write would silently lose registrations. The channels
//! are `boxcar::Vec` — a concurrent append-only list drained in combination
//! order at invocation time, the same lock-free aggregation discipline as a
//! compare-and-retry loop over an immutable composite.

use std::fmt;
use std::sync::Arc;

use crate::Result;

/// A registered reset action: a callable handle bound to no instance.
pub type ResetAction = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// The two channels of a module's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Channel {
    /// Actions invoked before static storage is blanked.
    Unload,
    /// Actions that blank storage and re-run copied initializers.
    Load,
}

/// Per-module pair of composable action chains with thread-safe registration
/// and invocation.
#[derive(Default)]
pub struct DispatchRegistry {
    unload: boxcar::Vec<ResetAction>,
    load: boxcar::Vec<ResetAction>,
}

impl DispatchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, channel: Channel) -> &boxcar::Vec<ResetAction> {
        match channel {
            Channel::Unload => &self.unload,
            Channel::Load => &self.load,
        }
    }

    /// Combines a callable into the channel's current composite.
    ///
    /// Never blocks and never loses registrations under arbitrary
    /// interleavings of concurrent callers. Entries accumulate for the
    /// lifetime of the module and are never individually removed.
    pub fn register(&self, channel: Channel, action: ResetAction) {
        self.channel(channel).push(action);
    }

    /// Invokes the channel's entire current composite, each constituent in
    /// the order it was combined.
    ///
    /// # Errors
    ///
    /// Nothing is swallowed: the first failing constituent propagates to the
    /// caller and the remaining constituents are skipped for this
    /// invocation. The composite itself is unchanged; the next invocation
    /// sees the full list again.
    pub fn invoke(&self, channel: Channel) -> Result<()> {
        for (_, action) in self.channel(channel).iter() {
            action()?;
        }
        Ok(())
    }

    /// Number of callables registered on a channel.
    #[must_use]
    pub fn len(&self, channel: Channel) -> usize {
        self.channel(channel).count()
    }

    /// Returns `true` when both channels are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unload.count() == 0 && self.load.count() == 0
    }
}

impl fmt::Debug for DispatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("unload", &self.unload.count())
            .field("load", &self.load.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_invocation_in_registration_order() {
        let registry = DispatchRegistry::new();
        let trace = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..3 {
            let trace = Arc::clone(&trace);
            registry.register(
                Channel::Unload,
                Arc::new(move || {
                    trace.lock().unwrap().push(i);
                    Ok(())
                }),
            );
        }

        registry.invoke(Channel::Unload).unwrap();
        assert_eq!(*trace.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_failure_skips_remainder_but_keeps_composite() {
        let registry = DispatchRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        registry.register(
            Channel::Load,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        registry.register(
            Channel::Load,
            Arc::new(|| {
                Err(crate::Error::CallbackFailed {
                    message: "boom".to_string(),
                })
            }),
        );
        let counter = Arc::clone(&calls);
        registry.register(
            Channel::Load,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        assert!(registry.invoke(Channel::Load).is_err());
        // First succeeded, second raised, third skipped.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Nothing was unregistered.
        assert_eq!(registry.len(Channel::Load), 3);
    }

    #[test]
    fn test_concurrent_registration_loses_nothing() {
        let registry = Arc::new(DispatchRegistry::new());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                registry.register(Channel::Unload, Arc::new(|| Ok(())));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(Channel::Unload), 16);
    }
}

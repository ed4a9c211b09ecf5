//! Component lifecycle.
//!
//! [`Hub::initialize`](crate::Hub::initialize) and
//! [`Hub::cleanup`](crate::Hub::cleanup) sweep every registered component
//! and call its capability when present. A failing component never stops
//! the sweep; its error is collected as a [`LifecycleFailure`].
//!
//! [`HubScope`] pairs the two: initialize on creation, cleanup on drop,
//! so cleanup also runs on early return and on unwinding panics.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::hub::Hub;

/// A lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Initialize,
    Cleanup,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize => write!(f, "initialize"),
            Self::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// One component's failed capability call.
#[derive(Debug)]
pub struct LifecycleFailure {
    /// Registered component name
    pub component: String,
    /// Dimension the component lives in
    pub dimension: String,
    /// Which capability failed
    pub phase: LifecyclePhase,
    /// The capability's error
    pub error: anyhow::Error,
}

impl fmt::Display for LifecycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of component '{}' in dimension '{}' failed: {}",
            self.phase, self.component, self.dimension, self.error
        )
    }
}

/// An initialized Hub that cleans up when dropped.
///
/// Created by [`Hub::scope`](crate::Hub::scope).
pub struct HubScope<'a> {
    hub: &'a mut Hub,
    init_failures: Vec<LifecycleFailure>,
}

impl<'a> HubScope<'a> {
    pub(crate) fn enter(hub: &'a mut Hub) -> Self {
        let init_failures = hub.initialize();
        Self { hub, init_failures }
    }

    /// Failures from the initialize sweep run on entry.
    pub fn init_failures(&self) -> &[LifecycleFailure] {
        &self.init_failures
    }
}

impl Deref for HubScope<'_> {
    type Target = Hub;

    fn deref(&self) -> &Hub {
        self.hub
    }
}

impl DerefMut for HubScope<'_> {
    fn deref_mut(&mut self) -> &mut Hub {
        self.hub
    }
}

impl Drop for HubScope<'_> {
    fn drop(&mut self) {
        let failures = self.hub.cleanup();
        if !failures.is_empty() {
            tracing::warn!(count = failures.len(), "hub scope closed with cleanup failures");
        }
    }
}

impl fmt::Debug for HubScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubScope")
            .field("init_failures", &self.init_failures.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(LifecyclePhase::Initialize.to_string(), "initialize");
        assert_eq!(LifecyclePhase::Cleanup.to_string(), "cleanup");
    }

    #[test]
    fn test_failure_display() {
        let failure = LifecycleFailure {
            component: "db".into(),
            dimension: "component".into(),
            phase: LifecyclePhase::Cleanup,
            error: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(
            failure.to_string(),
            "cleanup of component 'db' in dimension 'component' failed: connection reset"
        );
    }
}

//! Shared, atomically replaceable schedule handle.
//!
//! Evaluations take a snapshot (`Arc`) of the current schedule set and use
//! it for their whole duration. A reload swaps the whole set at once, so no
//! evaluation ever observes a half-replaced schedule.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::TariffSchedules;

/// Shared handle to the current tariff schedules.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    current: Arc<RwLock<Arc<TariffSchedules>>>,
}

impl ScheduleStore {
    /// Creates a store holding the given schedules.
    pub fn new(schedules: TariffSchedules) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(schedules))),
        }
    }

    /// Returns a snapshot of the current schedules.
    pub fn snapshot(&self) -> Arc<TariffSchedules> {
        // The guarded value is a single Arc; a poisoned lock still holds a complete set.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the whole schedule set, returning the previous one.
    pub fn replace(&self, schedules: TariffSchedules) -> Arc<TariffSchedules> {
        let version = schedules.metadata().version.clone();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, Arc::new(schedules));
        info!(
            previous = %previous.metadata().version,
            current = %version,
            "Replaced tariff schedules"
        );
        previous
    }
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::ProgressEvent;

/// How often the UI samples the shared progress counters.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
}

impl ProgressSnapshot {
    /// `None` while the total is still unknown.
    pub fn percentage(&self) -> Option<u8> {
        if self.total_bytes == 0 {
            return None;
        }
        let downloaded = self.downloaded_bytes.min(self.total_bytes) as u128;
        Some((downloaded * 100 / self.total_bytes as u128) as u8)
    }
}

/// Byte counters shared between the download worker (writer) and the UI (reader).
///
/// Both counters live behind one lock so readers always see a consistent pair.
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    inner: Arc<Mutex<ProgressSnapshot>>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProgressSnapshot> {
        // The pair is plain data; a panic mid-write cannot leave it half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.lock()
    }

    pub fn reset(&self) {
        *self.lock() = ProgressSnapshot::default();
    }

    pub fn apply(&self, event: &ProgressEvent) {
        let mut state = self.lock();
        match *event {
            ProgressEvent::Downloading {
                downloaded_bytes,
                total_bytes,
            } => {
                state.total_bytes = total_bytes;
                state.downloaded_bytes = if total_bytes > 0 {
                    downloaded_bytes.min(total_bytes)
                } else {
                    downloaded_bytes
                };
            }
            ProgressEvent::Finished => state.downloaded_bytes = state.total_bytes,
            ProgressEvent::Other(ref status) => {
                log::trace!("ignoring progress status {:?}", status);
            }
        }
    }
}

/// Read-only observer sampled on every UI tick.
#[derive(Debug, Clone)]
pub struct ProgressPoller {
    state: ProgressState,
}

impl ProgressPoller {
    pub fn new(state: ProgressState) -> Self {
        Self { state }
    }

    /// Returns the percentage to render, or `None` to keep the current display.
    pub fn tick(&self) -> Option<u8> {
        self.state.snapshot().percentage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloading(downloaded_bytes: u64, total_bytes: u64) -> ProgressEvent {
        ProgressEvent::Downloading {
            downloaded_bytes,
            total_bytes,
        }
    }

    #[test]
    fn test_idle_state_renders_nothing() {
        let state = ProgressState::new();
        let poller = ProgressPoller::new(state.clone());
        assert_eq!(poller.tick(), None);

        state.apply(&downloading(42, 0));
        assert_eq!(poller.tick(), None);
    }

    #[test]
    fn test_percentage_is_floored() {
        let state = ProgressState::new();
        let poller = ProgressPoller::new(state.clone());
        let total = 997;

        for downloaded in [0, 1, 9, 10, 498, 996, 997] {
            state.apply(&downloading(downloaded, total));
            let rendered = poller.tick().unwrap();
            assert_eq!(rendered as u64, downloaded * 100 / total);
            assert!(rendered <= 100);
        }
    }

    #[test]
    fn test_finished_caps_at_hundred() {
        let state = ProgressState::new();
        let poller = ProgressPoller::new(state.clone());

        state.apply(&downloading(3, 1000));
        assert_eq!(poller.tick(), Some(0));
        state.apply(&ProgressEvent::Finished);
        assert_eq!(poller.tick(), Some(100));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let state = ProgressState::new();
        state.apply(&downloading(1500, 1000));
        assert_eq!(
            state.snapshot(),
            ProgressSnapshot {
                downloaded_bytes: 1000,
                total_bytes: 1000
            }
        );
        assert_eq!(state.snapshot().percentage(), Some(100));
    }

    #[test]
    fn test_other_events_are_ignored_and_reset_clears() {
        let state = ProgressState::new();
        state.apply(&downloading(250, 1000));
        state.apply(&ProgressEvent::Other("error".to_string()));
        assert_eq!(state.snapshot().percentage(), Some(25));

        state.reset();
        assert_eq!(state.snapshot(), ProgressSnapshot::default());
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let state = ProgressState::new();
        state.apply(&downloading(u64::MAX / 2, u64::MAX));
        assert_eq!(state.snapshot().percentage(), Some(49));
    }
}

use ringbuffer::{ConstGenericRingBuffer, RingBuffer};

use super::ListenerFailure;

pub const DIAGNOSTICS_CAPACITY: usize = 64;

/// Sink for listener failures. Every failure is logged; the most recent ones are kept around for
/// inspection.
#[derive(Default)]
pub struct Diagnostics {
    recent: ConstGenericRingBuffer<ListenerFailure, DIAGNOSTICS_CAPACITY>,
    total: u64,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("recent", &self.recent.len())
            .field("total", &self.total)
            .finish()
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn report(&mut self, failure: ListenerFailure) {
        log::warn!("{failure}");

        self.total += 1;
        self.recent.push(failure);
    }

    pub fn report_all(&mut self, failures: impl IntoIterator<Item = ListenerFailure>) {
        for failure in failures {
            self.report(failure);
        }
    }

    /// Oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &ListenerFailure> {
        self.recent.iter()
    }

    /// Failures reported since creation, including ones no longer retained.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, ListenerError, ListenerRegistry, EventPayload, FrameInfo};

    #[test]
    fn keeps_only_recent_failures() {
        let registry = ListenerRegistry::new();
        registry.on(EventKind::Draw, "broken", |_| Err(anyhow::anyhow!("nope")));

        let mut diagnostics = Diagnostics::new();
        let frame = FrameInfo::default();
        for _ in 0..DIAGNOSTICS_CAPACITY + 6 {
            diagnostics.report_all(registry.dispatch(EventKind::Draw, &EventPayload::Frame(&frame)));
        }

        assert_eq!(diagnostics.total(), DIAGNOSTICS_CAPACITY as u64 + 6);
        assert_eq!(diagnostics.recent().count(), DIAGNOSTICS_CAPACITY);
        assert!(diagnostics
            .recent()
            .all(|failure| failure.error == ListenerError::Failed("nope".into())));

        diagnostics.clear();
        assert_eq!(diagnostics.recent().count(), 0);
    }
}

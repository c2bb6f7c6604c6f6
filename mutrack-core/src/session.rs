//! Per-track pass bookkeeping
//!
//! A host may start a new pass before the previous one has been applied
//! (fast panning, a filter change while data is still arriving). Every pass
//! takes a sequence-stamped ticket and only the newest ticket may commit, so
//! a late result from an older pass never overwrites a newer one.

use crate::config::LayoutConfig;
use crate::error::LayoutResult;
use crate::labels::TextMeasure;
use crate::layout::{compute_layout, LayoutOutcome};
use crate::types::LayoutInput;
use parking_lot::Mutex;
use std::sync::Arc;

/// Stamp handed out by [`TrackLayout::begin_pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassTicket(u64);

impl PassTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct SessionState {
    issued: u64,
    committed: Option<(u64, Arc<LayoutOutcome>)>,
}

#[derive(Debug, Default)]
pub struct TrackLayout {
    state: Mutex<SessionState>,
}

impl TrackLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_pass(&self) -> PassTicket {
        let mut state = self.state.lock();
        state.issued += 1;
        PassTicket(state.issued)
    }

    /// Whether no newer pass has been started since `ticket` was issued.
    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.state.lock().issued == ticket.0
    }

    /// Store the outcome of a pass. Returns false and drops the outcome when
    /// a newer pass has been started in the meantime.
    pub fn commit(&self, ticket: PassTicket, outcome: LayoutOutcome) -> bool {
        self.commit_shared(ticket, outcome).is_some()
    }

    /// Commit and hand back the stored outcome from under the same lock.
    fn commit_shared(&self, ticket: PassTicket, outcome: LayoutOutcome) -> Option<Arc<LayoutOutcome>> {
        let mut state = self.state.lock();
        if state.issued != ticket.0 {
            log::debug!("Discarding stale layout pass {} (latest is {})", ticket.0, state.issued);
            return None;
        }
        let outcome = Arc::new(outcome);
        state.committed = Some((ticket.0, Arc::clone(&outcome)));
        Some(outcome)
    }

    /// The most recently committed outcome, if any.
    pub fn latest(&self) -> Option<Arc<LayoutOutcome>> {
        self.state.lock().committed.as_ref().map(|(_, outcome)| Arc::clone(outcome))
    }

    pub fn latest_sequence(&self) -> Option<u64> {
        self.state.lock().committed.as_ref().map(|(seq, _)| *seq)
    }

    /// Run a pass end to end. The lock is not held while computing, so a
    /// newer pass started meanwhile supersedes this one. Returns `None` when
    /// the result was discarded as stale.
    pub fn run(
        &self,
        input: &LayoutInput,
        config: &LayoutConfig,
        measure: &dyn TextMeasure,
    ) -> LayoutResult<Option<Arc<LayoutOutcome>>> {
        let ticket = self.begin_pass();
        let outcome = compute_layout(input, config, measure)?;
        Ok(self.commit_shared(ticket, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::LayoutStats;
    use crate::types::RegionSpec;

    fn no_data(events_seen: usize) -> LayoutOutcome {
        LayoutOutcome::NoData {
            stats: LayoutStats { events_seen, ..Default::default() },
        }
    }

    #[test]
    fn test_tickets_increase() {
        let track = TrackLayout::new();
        let a = track.begin_pass();
        let b = track.begin_pass();
        assert!(b > a);
        assert!(!track.is_current(a));
        assert!(track.is_current(b));
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        let track = TrackLayout::new();
        let old = track.begin_pass();
        let new = track.begin_pass();

        assert!(track.commit(new, no_data(2)));
        assert!(!track.commit(old, no_data(1)));

        let latest = track.latest().unwrap();
        assert_eq!(latest.stats().events_seen, 2);
        assert_eq!(track.latest_sequence(), Some(new.sequence()));
    }

    #[test]
    fn test_nothing_committed_initially() {
        let track = TrackLayout::new();
        assert!(track.latest().is_none());
    }

    #[test]
    fn test_run_commits_result() {
        let track = TrackLayout::new();
        let input = LayoutInput {
            regions: vec![RegionSpec::new("chr2", 0, 1000, 1000.0)],
            ..Default::default()
        };
        let measure = |_: &str| 10.0;
        let outcome = track.run(&input, &LayoutConfig::default(), &measure).unwrap().unwrap();
        assert!(outcome.is_no_data());
        assert!(track.latest().is_some());
    }

    #[test]
    fn test_committed_outcome_is_the_pass_own_result() {
        let track = TrackLayout::new();
        let ticket = track.begin_pass();
        let mine = track.commit_shared(ticket, no_data(1)).unwrap();
        assert!(Arc::ptr_eq(&mine, &track.latest().unwrap()));

        let newer = track.begin_pass();
        assert!(track.commit(newer, no_data(2)));
        assert_eq!(mine.stats().events_seen, 1);
        assert_eq!(track.latest().unwrap().stats().events_seen, 2);
    }

    #[test]
    fn test_concurrent_passes_keep_newest() {
        let track = Arc::new(TrackLayout::new());
        let tickets: Vec<PassTicket> = (0..8).map(|_| track.begin_pass()).collect();
        let newest = *tickets.last().unwrap();

        let handles: Vec<_> = tickets
            .into_iter()
            .map(|ticket| {
                let track = Arc::clone(&track);
                std::thread::spawn(move || track.commit(ticket, no_data(ticket.sequence() as usize)))
            })
            .collect();
        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap() as usize).sum();

        assert_eq!(accepted, 1);
        assert_eq!(track.latest_sequence(), Some(newest.sequence()));
    }
}

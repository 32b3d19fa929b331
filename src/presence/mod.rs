//! Presence tracking strategies.
//!
//! Three ways to learn whether contacts are online, picked once from the
//! server's `RPL_ISUPPORT` tokens:
//!
//! - [`WatchStrategy`]: `WATCH` lists, server pushes 600-605
//! - [`MonitorStrategy`]: `MONITOR` lists, server pushes 730/731
//! - [`PollStrategy`]: periodic `ISON`, offline inferred by absence

mod monitor;
mod poll;
mod watch;

pub use monitor::MonitorStrategy;
pub use poll::PollStrategy;
pub use watch::WatchStrategy;

use slirc_proto::{CommandKind, Message, ServerCapabilities};

use crate::contacts::ContactBook;
use crate::error::ClientError;
use crate::sink::MessageSink;

/// Ticks an unanswered ISON cycle may hold up before it is abandoned.
pub const DEFAULT_MAX_SKIPPED_POLLS: u32 = 3;

/// Byte budget for the nickname list of one outgoing line.
const LIST_BUDGET: usize = 400;

/// Which protocol a tracker speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Watch,
    Monitor,
    Poll,
}

/// Keeps the `online` flag of contacts current.
///
/// Lifecycle: the first [`add_nicks`](Self::add_nicks) call receives the
/// whole contact set; later calls carry deltas. Inbound messages of the kinds
/// in [`interests`](Self::interests) arrive through
/// [`handle`](Self::handle) and [`tick`](Self::tick) fires on the poll timer.
/// Nicknames the book does not know are ignored.
pub trait PresenceTracker: Send {
    fn kind(&self) -> StrategyKind;

    /// Message kinds this tracker wants delivered.
    fn interests(&self) -> &'static [CommandKind];

    fn add_nicks(&mut self, nicks: &[String], sink: &dyn MessageSink) -> Result<(), ClientError>;

    fn remove_nicks(&mut self, nicks: &[String], sink: &dyn MessageSink)
    -> Result<(), ClientError>;

    /// Apply a status message to `contacts`.
    fn handle(&mut self, message: &Message, contacts: &mut ContactBook, sink: &dyn MessageSink);

    /// Timer hook. Event-driven strategies do nothing here.
    fn tick(
        &mut self,
        _contacts: &mut ContactBook,
        _sink: &dyn MessageSink,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    /// Number of nicknames currently registered with the server.
    fn tracked(&self) -> usize;
}

/// Pick the strategy for `caps`.
///
/// A non-zero WATCH limit wins, then a non-zero MONITOR limit, otherwise
/// ISON polling.
pub fn select(caps: &ServerCapabilities, max_skipped_polls: u32) -> Box<dyn PresenceTracker> {
    match (caps.max_watches(), caps.max_monitors()) {
        (Some(limit), _) if limit > 0 => Box::new(WatchStrategy::new(limit)),
        (_, Some(limit)) if limit > 0 => Box::new(MonitorStrategy::new(limit)),
        _ => Box::new(PollStrategy::new(max_skipped_polls)),
    }
}

/// Split `nicks` into runs whose encoded list stays under [`LIST_BUDGET`].
///
/// `overhead` is the per-nickname cost on top of its length (separator,
/// sign). A single over-long nickname still gets a batch of its own.
fn batches(nicks: &[String], overhead: usize) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    let mut used = 0;

    for nick in nicks {
        let cost = nick.len() + overhead;
        if !current.is_empty() && used + cost > LIST_BUDGET {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        used += cost;
        current.push(nick.clone());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_prefers_watch_then_monitor() {
        let both = ServerCapabilities::new().with("WATCH", 5).with("MONITOR", 5);
        assert_eq!(select(&both, 3).kind(), StrategyKind::Watch);

        let monitor = ServerCapabilities::new().with("WATCH", 0).with("MONITOR", 3);
        assert_eq!(select(&monitor, 3).kind(), StrategyKind::Monitor);

        let bare = ServerCapabilities::new().with_flag("MONITOR");
        assert_eq!(select(&bare, 3).kind(), StrategyKind::Monitor);

        let none = ServerCapabilities::new().with("WATCH", 0).with("MONITOR", 0);
        assert_eq!(select(&none, 3).kind(), StrategyKind::Poll);
        assert_eq!(select(&ServerCapabilities::new(), 3).kind(), StrategyKind::Poll);
    }

    #[test]
    fn batches_respect_budget() {
        let nicks: Vec<String> = (0..100).map(|i| format!("nickname{:02}", i)).collect();
        let runs = batches(&nicks, 1);
        assert!(runs.len() > 1);
        for run in &runs {
            let size: usize = run.iter().map(|n| n.len() + 1).sum();
            assert!(size <= LIST_BUDGET);
        }
        assert_eq!(runs.concat(), nicks);
    }

    #[test]
    fn batches_of_nothing() {
        assert!(batches(&[], 1).is_empty());
    }
}

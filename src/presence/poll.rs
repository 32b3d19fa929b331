//! ISON polling, for servers without WATCH or MONITOR.
//!
//! An `RPL_ISON` reply lists only the requested nicknames that are online,
//! so the sole offline signal is a nickname missing from the reply. Each
//! cycle records what it asked for in `awaiting`; once every reply of the
//! cycle is in, whatever is left in `awaiting` is marked offline.
//!
//! A tick that finds a cycle still outstanding is skipped. After
//! `max_skipped` consecutive skips the cycle is given up: its leftovers are
//! reconciled as offline and a fresh cycle starts.

use std::collections::{BTreeMap, BTreeSet};

use slirc_proto::{irc_to_lower, Command, CommandKind, Message};
use tracing::{debug, warn};

use super::{batches, PresenceTracker, StrategyKind};
use crate::contacts::ContactBook;
use crate::error::ClientError;
use crate::sink::MessageSink;

const INTERESTS: &[CommandKind] = &[CommandKind::IsonReply];

/// Client-driven presence over periodic `ISON`.
#[derive(Debug)]
pub struct PollStrategy {
    /// Case-folded nickname to nickname as sent.
    tracked: BTreeMap<String, String>,
    /// Case-folded nicknames asked about in the current cycle and not yet
    /// reported online.
    awaiting: BTreeSet<String>,
    /// Replies still expected for the current cycle.
    pending_replies: usize,
    skipped: u32,
    max_skipped: u32,
}

impl PollStrategy {
    pub fn new(max_skipped: u32) -> Self {
        Self {
            tracked: BTreeMap::new(),
            awaiting: BTreeSet::new(),
            pending_replies: 0,
            skipped: 0,
            max_skipped,
        }
    }

    /// Nicknames of the outstanding cycle, case-folded.
    pub fn awaiting(&self) -> impl Iterator<Item = &str> {
        self.awaiting.iter().map(String::as_str)
    }

    /// Whether a cycle is waiting on replies.
    pub fn is_polling(&self) -> bool {
        !self.awaiting.is_empty() || self.pending_replies > 0
    }

    /// Close the cycle: every nickname still awaiting is offline.
    fn reconcile(&mut self, contacts: &mut ContactBook) {
        for key in std::mem::take(&mut self.awaiting) {
            contacts.set_online(&key, false);
        }
        self.pending_replies = 0;
        self.skipped = 0;
    }

    fn on_reply(&mut self, online: &[String], contacts: &mut ContactBook) {
        for nick in online {
            let key = irc_to_lower(nick);
            self.awaiting.remove(&key);
            if !contacts.set_online(nick, true) {
                debug!(nick = %nick, "ISON reported a non-contact, dropping it");
                self.tracked.remove(&key);
            }
        }

        if self.pending_replies == 0 {
            debug!("ISON reply outside a poll cycle");
            return;
        }
        self.pending_replies -= 1;
        if self.pending_replies == 0 {
            self.reconcile(contacts);
        }
    }
}

impl PresenceTracker for PollStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Poll
    }

    fn interests(&self) -> &'static [CommandKind] {
        INTERESTS
    }

    fn add_nicks(&mut self, nicks: &[String], _sink: &dyn MessageSink) -> Result<(), ClientError> {
        for nick in nicks {
            self.tracked
                .entry(irc_to_lower(nick))
                .or_insert_with(|| nick.clone());
        }
        Ok(())
    }

    fn remove_nicks(
        &mut self,
        nicks: &[String],
        _sink: &dyn MessageSink,
    ) -> Result<(), ClientError> {
        for nick in nicks {
            let key = irc_to_lower(nick);
            self.tracked.remove(&key);
            self.awaiting.remove(&key);
        }
        Ok(())
    }

    fn handle(&mut self, message: &Message, contacts: &mut ContactBook, _sink: &dyn MessageSink) {
        if let Command::IsonReply(reply) = &message.command {
            self.on_reply(&reply.nicks, contacts);
        }
    }

    fn tick(&mut self, contacts: &mut ContactBook, sink: &dyn MessageSink) -> Result<(), ClientError> {
        if !sink.is_connected() {
            debug!("Not connected, skipping poll");
            return Ok(());
        }

        if self.is_polling() {
            self.skipped += 1;
            if self.skipped <= self.max_skipped {
                debug!(skipped = self.skipped, "Poll cycle outstanding, skipping tick");
                return Ok(());
            }
            warn!(
                awaiting = self.awaiting.len(),
                skipped = self.skipped,
                "Abandoning unanswered poll cycle"
            );
            self.reconcile(contacts);
        }

        if self.tracked.is_empty() {
            return Ok(());
        }

        let nicks: Vec<String> = self.tracked.values().cloned().collect();
        let requests = batches(&nicks, 1);
        self.awaiting.extend(self.tracked.keys().cloned());
        self.pending_replies = requests.len();

        for batch in requests {
            if let Err(e) = sink.send(Message::ison(batch)) {
                self.awaiting.clear();
                self.pending_replies = 0;
                return Err(e);
            }
        }
        debug!(count = nicks.len(), "Sent ISON poll");
        Ok(())
    }

    fn tracked(&self) -> usize {
        self.tracked.len()
    }
}

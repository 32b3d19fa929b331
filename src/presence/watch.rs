//! WATCH-based tracking (`WATCH=<n>` in `RPL_ISUPPORT`).

use std::collections::BTreeMap;

use slirc_proto::command::WatchedUser;
use slirc_proto::{irc_to_lower, Command, CommandKind, Message};
use tracing::{debug, warn};

use super::{batches, PresenceTracker, StrategyKind};
use crate::contacts::ContactBook;
use crate::error::ClientError;
use crate::sink::MessageSink;

const INTERESTS: &[CommandKind] = &[
    CommandKind::WatchLogon,
    CommandKind::WatchLogoff,
    CommandKind::WatchStopped,
    CommandKind::WatchNowOn,
    CommandKind::WatchNowOff,
    CommandKind::TooManyWatch,
];

/// Server-pushed presence over `WATCH +nick` / `WATCH -nick`.
#[derive(Debug)]
pub struct WatchStrategy {
    limit: usize,
    /// Case-folded nickname to nickname as sent.
    tracked: BTreeMap<String, String>,
}

impl WatchStrategy {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            tracked: BTreeMap::new(),
        }
    }

    fn apply(&self, user: &WatchedUser, online: bool, contacts: &mut ContactBook) {
        let mask = online.then(|| user.mask());
        contacts.update(&user.nick, online, mask, user.changed_at());
    }
}

impl PresenceTracker for WatchStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Watch
    }

    fn interests(&self) -> &'static [CommandKind] {
        INTERESTS
    }

    fn add_nicks(&mut self, nicks: &[String], sink: &dyn MessageSink) -> Result<(), ClientError> {
        let mut fresh: Vec<String> = Vec::new();
        for nick in nicks {
            let key = irc_to_lower(nick);
            if self.tracked.contains_key(&key) || fresh.iter().any(|f| irc_to_lower(f) == key) {
                continue;
            }
            if self.tracked.len() + fresh.len() >= self.limit {
                warn!(nick = %nick, limit = self.limit, "WATCH list full, not tracking");
                continue;
            }
            fresh.push(nick.clone());
        }

        // Only names the server was actually told about count as tracked.
        for batch in batches(&fresh, 2) {
            sink.send(Message::watch(batch.clone(), Vec::new()))?;
            for nick in batch {
                self.tracked.insert(irc_to_lower(&nick), nick);
            }
        }
        Ok(())
    }

    fn remove_nicks(
        &mut self,
        nicks: &[String],
        sink: &dyn MessageSink,
    ) -> Result<(), ClientError> {
        let gone: Vec<String> = nicks
            .iter()
            .filter_map(|nick| {
                let key = irc_to_lower(nick);
                self.tracked.get(&key).map(|sent| (key, sent.clone()))
            })
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect();

        for batch in batches(&gone, 2) {
            sink.send(Message::watch(Vec::new(), batch.clone()))?;
            for nick in &batch {
                self.tracked.remove(&irc_to_lower(nick));
            }
        }
        Ok(())
    }

    fn handle(&mut self, message: &Message, contacts: &mut ContactBook, _sink: &dyn MessageSink) {
        match &message.command {
            Command::WatchLogon(reply) => self.apply(reply, true, contacts),
            Command::WatchNowOn(reply) => self.apply(reply, true, contacts),
            Command::WatchLogoff(reply) => self.apply(reply, false, contacts),
            Command::WatchNowOff(reply) => self.apply(reply, false, contacts),
            Command::WatchStopped(reply) => {
                debug!(nick = %reply.nick, "Stopped watching");
            }
            Command::TooManyWatch(reply) => {
                warn!(nick = %reply.nick, text = %reply.text, "Server refused WATCH entry");
                self.tracked.remove(&irc_to_lower(&reply.nick));
            }
            _ => {}
        }
    }

    fn tracked(&self) -> usize {
        self.tracked.len()
    }
}

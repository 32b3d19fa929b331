//! MONITOR-based tracking (`MONITOR=<n>` in `RPL_ISUPPORT`).

use std::collections::BTreeMap;

use slirc_proto::{irc_to_lower, Command, CommandKind, Message};
use tracing::warn;

use super::{batches, PresenceTracker, StrategyKind};
use crate::contacts::ContactBook;
use crate::error::ClientError;
use crate::sink::MessageSink;

const INTERESTS: &[CommandKind] = &[
    CommandKind::MonOnline,
    CommandKind::MonOffline,
    CommandKind::MonListFull,
];

/// Server-pushed presence over `MONITOR + nick,...` / `MONITOR - nick,...`.
#[derive(Debug)]
pub struct MonitorStrategy {
    limit: usize,
    tracked: BTreeMap<String, String>,
}

impl MonitorStrategy {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            tracked: BTreeMap::new(),
        }
    }
}

impl PresenceTracker for MonitorStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Monitor
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
                warn!(nick = %nick, limit = self.limit, "MONITOR list full, not tracking");
                continue;
            }
            fresh.push(nick.clone());
        }

        // Only names the server was actually told about count as tracked.
        for batch in batches(&fresh, 1) {
            sink.send(Message::monitor_add(batch.clone()))?;
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

        for batch in batches(&gone, 1) {
            sink.send(Message::monitor_remove(batch.clone()))?;
            for nick in &batch {
                self.tracked.remove(&irc_to_lower(nick));
            }
        }
        Ok(())
    }

    fn handle(&mut self, message: &Message, contacts: &mut ContactBook, _sink: &dyn MessageSink) {
        match &message.command {
            Command::MonOnline(reply) => {
                for user in &reply.users {
                    if let Some(nick) = user.nick() {
                        let mask = user.user().is_some().then(|| user.clone());
                        contacts.update(nick, true, mask, None);
                    }
                }
            }
            Command::MonOffline(reply) => {
                for nick in &reply.nicks {
                    contacts.set_online(nick, false);
                }
            }
            Command::MonListFull(reply) => {
                warn!(
                    limit = reply.limit,
                    refused = ?reply.nicks,
                    "Server MONITOR list is full"
                );
                for nick in &reply.nicks {
                    self.tracked.remove(&irc_to_lower(nick));
                }
            }
            _ => {}
        }
    }

    fn tracked(&self) -> usize {
        self.tracked.len()
    }
}

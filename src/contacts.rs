//! The contact set and the list that keeps it current.
//!
//! [`ContactBook`] holds the records. [`ContactList`] owns the book, picks a
//! [`PresenceTracker`] once the server's capabilities are known and forwards
//! membership changes to it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use slirc_proto::{irc_to_lower, CommandKind, Message, Prefix, ServerCapabilities};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::presence::{self, PresenceTracker, StrategyKind, DEFAULT_MAX_SKIPPED_POLLS};
use crate::router::Subscriber;
use crate::sink::MessageSink;

/// Whether `nick` can be sent as a nickname parameter.
///
/// Rejects characters that separate or mark up nickname lists (space, comma,
/// `!`, `@`, wildcards), a leading channel sigil or digit, and control
/// characters.
pub fn is_valid_nickname(nick: &str) -> bool {
    let mut chars = nick.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if first.is_ascii_digit() || matches!(first, '-' | '#' | '&' | '+' | '!' | ':' | '$') {
        return false;
    }
    nick.chars()
        .all(|c| !c.is_control() && !matches!(c, ' ' | ',' | '*' | '?' | '!' | '@' | ':'))
}

/// A status transition of one contact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresenceEvent {
    /// Nickname as the contact was added.
    pub nick: String,
    /// New status.
    pub online: bool,
}

/// One tracked user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactEntry {
    nickname: String,
    online: bool,
    mask: Option<Prefix>,
    changed_at: Option<DateTime<Utc>>,
}

impl ContactEntry {
    fn new(nickname: &str) -> Self {
        Self {
            nickname: nickname.to_owned(),
            online: false,
            mask: None,
            changed_at: None,
        }
    }

    /// Nickname as it was added.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Last known status. Contacts start offline.
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Last `nick!user@host` the server reported, if any.
    pub fn mask(&self) -> Option<&Prefix> {
        self.mask.as_ref()
    }

    /// When the status last changed.
    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        self.changed_at
    }
}

/// Contact records keyed by case-folded nickname.
#[derive(Debug, Default)]
pub struct ContactBook {
    entries: BTreeMap<String, ContactEntry>,
    events: Vec<PresenceEvent>,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `nick`. Returns false if it was already present.
    pub fn insert(&mut self, nick: &str) -> bool {
        let key = irc_to_lower(nick);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, ContactEntry::new(nick));
        true
    }

    pub fn remove(&mut self, nick: &str) -> Option<ContactEntry> {
        self.entries.remove(&irc_to_lower(nick))
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.entries.contains_key(&irc_to_lower(nick))
    }

    pub fn get(&self, nick: &str) -> Option<&ContactEntry> {
        self.entries.get(&irc_to_lower(nick))
    }

    /// Nicknames in case-folded order.
    pub fn nicknames(&self) -> Vec<String> {
        self.entries.values().map(|e| e.nickname.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set the status of `nick`.
    ///
    /// Returns false when `nick` is not a contact; nothing is created.
    pub fn set_online(&mut self, nick: &str, online: bool) -> bool {
        self.update(nick, online, None, None)
    }

    /// Set the status of `nick`, recording the reported mask and change time.
    ///
    /// A transition queues a [`PresenceEvent`]. `since` defaults to now.
    pub fn update(
        &mut self,
        nick: &str,
        online: bool,
        mask: Option<Prefix>,
        since: Option<DateTime<Utc>>,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&irc_to_lower(nick)) else {
            debug!(nick = %nick, "Status for unknown nickname ignored");
            return false;
        };

        if mask.is_some() {
            entry.mask = mask;
        }
        if entry.online != online {
            entry.online = online;
            entry.changed_at = Some(since.unwrap_or_else(Utc::now));
            info!(nick = %entry.nickname, online, "Contact status changed");
            self.events.push(PresenceEvent {
                nick: entry.nickname.clone(),
                online,
            });
        }
        true
    }

    /// Take the transitions recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<PresenceEvent> {
        std::mem::take(&mut self.events)
    }
}

/// The watched-user set plus the one strategy that keeps it current.
///
/// Until [`initialize`](Self::initialize) runs, membership changes only touch
/// the book; `initialize` pushes the whole set to the chosen strategy.
pub struct ContactList {
    book: ContactBook,
    tracker: Option<Box<dyn PresenceTracker>>,
    max_skipped_polls: u32,
}

impl Default for ContactList {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactList {
    pub fn new() -> Self {
        Self {
            book: ContactBook::new(),
            tracker: None,
            max_skipped_polls: DEFAULT_MAX_SKIPPED_POLLS,
        }
    }

    /// Contacts to track from the start. Invalid nicknames are skipped.
    pub fn with_contacts<I, S>(mut self, nicks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for nick in nicks {
            let nick = nick.as_ref();
            if is_valid_nickname(nick) {
                self.book.insert(nick);
            } else {
                warn!(nick = %nick, "Skipping invalid contact nickname");
            }
        }
        self
    }

    /// How many poll ticks an unanswered cycle may hold up before it is
    /// abandoned. Only used by ISON polling.
    pub fn with_max_skipped_polls(mut self, limit: u32) -> Self {
        self.max_skipped_polls = limit;
        self
    }

    /// Pick the strategy from `caps` and push every contact through it.
    ///
    /// The choice is final. A second call is ignored. If the contacts cannot
    /// be sent, no strategy is kept and the call may be repeated.
    pub fn initialize(
        &mut self,
        caps: &ServerCapabilities,
        sink: &dyn MessageSink,
    ) -> Result<(), ClientError> {
        if let Some(tracker) = &self.tracker {
            warn!(strategy = ?tracker.kind(), "Contact list already initialized");
            return Ok(());
        }

        let mut tracker = presence::select(caps, self.max_skipped_polls);
        tracker.add_nicks(&self.book.nicknames(), sink)?;
        info!(
            strategy = ?tracker.kind(),
            contacts = self.book.len(),
            "Presence tracking started"
        );
        self.tracker = Some(tracker);
        Ok(())
    }

    /// Whether a strategy has been picked.
    pub fn is_initialized(&self) -> bool {
        self.tracker.is_some()
    }

    /// The active strategy, once initialized.
    pub fn strategy(&self) -> Option<StrategyKind> {
        self.tracker.as_ref().map(|t| t.kind())
    }

    /// Start tracking `nick`. Returns false if it is already a contact or is
    /// not a valid nickname.
    ///
    /// Nothing is recorded when the addition cannot be sent.
    pub fn add(&mut self, nick: &str, sink: &dyn MessageSink) -> Result<bool, ClientError> {
        if !is_valid_nickname(nick) {
            warn!(nick = %nick, "Refusing invalid contact nickname");
            return Ok(false);
        }
        if self.book.contains(nick) {
            return Ok(false);
        }
        if let Some(tracker) = &mut self.tracker {
            tracker.add_nicks(&[nick.to_owned()], sink)?;
        }
        self.book.insert(nick);
        Ok(true)
    }

    /// Stop tracking `nick`. Returns false if it was not a contact.
    ///
    /// On error the contact is kept, so the removal can be retried.
    pub fn remove(&mut self, nick: &str, sink: &dyn MessageSink) -> Result<bool, ClientError> {
        let Some(entry) = self.book.get(nick) else {
            return Ok(false);
        };
        if let Some(tracker) = &mut self.tracker {
            tracker.remove_nicks(&[entry.nickname.clone()], sink)?;
        }
        self.book.remove(nick);
        Ok(true)
    }

    /// Drive the strategy's timer.
    pub fn tick(&mut self, sink: &dyn MessageSink) -> Result<(), ClientError> {
        match &mut self.tracker {
            Some(tracker) => tracker.tick(&mut self.book, sink),
            None => Ok(()),
        }
    }

    pub fn get(&self, nick: &str) -> Option<&ContactEntry> {
        self.book.get(nick)
    }

    pub fn contacts(&self) -> &ContactBook {
        &self.book
    }

    /// Copy of every record, for snapshots.
    pub fn snapshot(&self) -> Vec<ContactEntry> {
        self.book.iter().cloned().collect()
    }

    pub fn drain_events(&mut self) -> Vec<PresenceEvent> {
        self.book.drain_events()
    }
}

impl Subscriber for ContactList {
    fn interests(&self) -> Vec<CommandKind> {
        self.tracker
            .as_ref()
            .map(|t| t.interests().to_vec())
            .unwrap_or_default()
    }

    fn notify(&mut self, message: &Message, sink: &dyn MessageSink) {
        if let Some(tracker) = &mut self.tracker {
            tracker.handle(message, &mut self.book, sink);
        }
    }
}

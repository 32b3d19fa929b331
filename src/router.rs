//! Delivery of decoded messages to the parties that asked for them.
//!
//! Subscribers register the [`CommandKind`]s they care about and only ever
//! see messages of those kinds. The router stores ids, not subscribers: the
//! owner passes the subscribers in at delivery time, so everything stays on
//! the connection task without shared ownership or locks.

use std::collections::HashMap;

use slirc_proto::{CommandKind, Message};
use tracing::trace;

use crate::sink::MessageSink;

/// A party interested in some inbound message kinds.
pub trait Subscriber {
    /// Kinds to deliver. Re-read by [`Router::resubscribe`].
    fn interests(&self) -> Vec<CommandKind>;

    fn notify(&mut self, message: &Message, sink: &dyn MessageSink);
}

/// Slot of a registered subscriber.
///
/// Ids are handed out from zero in registration order and index the slice
/// passed to [`Router::deliver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

impl SubscriberId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-kind routing table.
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<CommandKind, Vec<SubscriberId>>,
    next: usize,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subscriber` under its current interests.
    pub fn subscribe(&mut self, subscriber: &dyn Subscriber) -> SubscriberId {
        let id = SubscriberId(self.next);
        self.next += 1;
        self.route(id, subscriber.interests());
        id
    }

    /// Replace the interests registered for `id`.
    pub fn resubscribe(&mut self, id: SubscriberId, subscriber: &dyn Subscriber) {
        self.unsubscribe(id);
        self.route(id, subscriber.interests());
    }

    /// Stop delivering anything to `id`. The slot stays reserved.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.routes.retain(|_, ids| {
            ids.retain(|&other| other != id);
            !ids.is_empty()
        });
    }

    fn route(&mut self, id: SubscriberId, kinds: Vec<CommandKind>) {
        for kind in kinds {
            let ids = self.routes.entry(kind).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    /// Whether anyone listens for `kind`.
    pub fn is_routed(&self, kind: CommandKind) -> bool {
        self.routes.contains_key(&kind)
    }

    /// Hand `message` to every subscriber registered for its kind, in
    /// registration order. `subscribers[i]` must be the one registered as id
    /// `i`; missing slots are skipped.
    ///
    /// Returns how many subscribers were notified.
    pub fn deliver(
        &self,
        message: &Message,
        subscribers: &mut [&mut dyn Subscriber],
        sink: &dyn MessageSink,
    ) -> usize {
        let Some(ids) = self.routes.get(&message.kind()) else {
            trace!(kind = ?message.kind(), "No subscriber");
            return 0;
        };

        let mut delivered = 0;
        for id in ids {
            if let Some(subscriber) = subscribers.get_mut(id.0) {
                subscriber.notify(message, sink);
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::testing::RecordingSink;
    use slirc_proto::Dispatcher;

    struct Recorder {
        kinds: Vec<CommandKind>,
        seen: Vec<CommandKind>,
    }

    impl Recorder {
        fn new(kinds: &[CommandKind]) -> Self {
            Self {
                kinds: kinds.to_vec(),
                seen: Vec::new(),
            }
        }
    }

    impl Subscriber for Recorder {
        fn interests(&self) -> Vec<CommandKind> {
            self.kinds.clone()
        }

        fn notify(&mut self, message: &Message, _sink: &dyn MessageSink) {
            self.seen.push(message.kind());
        }
    }

    fn decode(line: &str) -> Message {
        Dispatcher::default().decode(line).unwrap()
    }

    #[test]
    fn delivers_only_registered_kinds() {
        let sink = RecordingSink::new();
        let mut router = Router::new();
        let mut pings = Recorder::new(&[CommandKind::Ping]);
        let mut replies = Recorder::new(&[CommandKind::IsonReply, CommandKind::Ping]);
        assert_eq!(router.subscribe(&pings).index(), 0);
        assert_eq!(router.subscribe(&replies).index(), 1);

        for line in ["PING :x", ":srv 303 me :a", "PRIVMSG #c :hi"] {
            router.deliver(&decode(line), &mut [&mut pings, &mut replies], &sink);
        }

        assert_eq!(pings.seen, [CommandKind::Ping]);
        assert_eq!(replies.seen, [CommandKind::Ping, CommandKind::IsonReply]);
        assert!(!router.is_routed(CommandKind::Privmsg));
    }

    #[test]
    fn resubscribe_replaces_interests() {
        let sink = RecordingSink::new();
        let mut router = Router::new();
        let mut sub = Recorder::new(&[]);
        let id = router.subscribe(&sub);
        assert_eq!(router.deliver(&decode(":srv 303 me :a"), &mut [&mut sub], &sink), 0);

        sub.kinds = vec![CommandKind::IsonReply];
        router.resubscribe(id, &sub);
        assert_eq!(router.deliver(&decode(":srv 303 me :a"), &mut [&mut sub], &sink), 1);

        router.unsubscribe(id);
        assert!(!router.is_routed(CommandKind::IsonReply));
    }
}

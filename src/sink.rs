//! The outbound boundary: encoding messages and handing lines to the writer.

use std::sync::atomic::{AtomicBool, Ordering};

use slirc_proto::{Dispatcher, Message, ServerCapabilities};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ClientError;

/// Something that accepts outgoing messages.
///
/// Sending is fire-and-forget: nothing waits for a server reply.
/// Implementations encode before queueing so a message that fails
/// validation is rejected before any bytes exist.
pub trait MessageSink {
    /// Encode and queue `message`.
    ///
    /// Fails with [`ClientError::Protocol`] for an invalid message and with
    /// [`ClientError::TransportUnavailable`] when disconnected.
    fn send(&self, message: Message) -> Result<(), ClientError>;

    /// Whether the transport is currently up.
    fn is_connected(&self) -> bool;
}

/// [`MessageSink`] feeding encoded lines into an unbounded channel drained by
/// the connection's writer.
#[derive(Debug)]
pub struct ChannelSink {
    dispatcher: Dispatcher,
    tx: mpsc::UnboundedSender<String>,
    connected: AtomicBool,
}

impl ChannelSink {
    /// A sink that starts out disconnected.
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            dispatcher: Dispatcher::default(),
            tx,
            connected: AtomicBool::new(false),
        }
    }

    /// Mark the transport up or down.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    /// Validate outgoing messages against what the server advertised.
    pub fn set_capabilities(&mut self, caps: ServerCapabilities) {
        self.dispatcher.set_capabilities(caps);
    }

    /// Dispatcher used for encoding.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl MessageSink for ChannelSink {
    fn send(&self, message: Message) -> Result<(), ClientError> {
        let line = self.dispatcher.encode(&message)?;
        if !self.is_connected() {
            return Err(ClientError::TransportUnavailable);
        }
        debug!(line = %line, "Queueing line");
        self.tx
            .send(line)
            .map_err(|_| ClientError::TransportUnavailable)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed) && !self.tx.is_closed()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use slirc_proto::command::Topic;

    #[test]
    fn send_requires_connection() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);

        let err = sink.send(Message::nick("watcher")).unwrap_err();
        assert!(matches!(err, ClientError::TransportUnavailable));

        sink.set_connected(true);
        sink.send(Message::nick("watcher")).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "NICK watcher");
    }

    #[test]
    fn invalid_message_rejected_before_queueing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        sink.set_connected(true);

        let err = sink
            .send(Message::new(Topic {
                channel: String::new(),
                topic: Some("hi".into()),
            }))
            .unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_writer_reads_as_disconnected() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        sink.set_connected(true);
        drop(rx);

        assert!(!sink.is_connected());
        assert!(matches!(
            sink.send(Message::nick("watcher")),
            Err(ClientError::TransportUnavailable)
        ));
    }
}

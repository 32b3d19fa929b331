//! The connection task.
//!
//! One task owns the [`Session`] and multiplexes the framed server stream,
//! the poll timer and commands from [`ClientHandle`]s. Inbound handling, poll
//! ticks and contact edits therefore never interleave.

use futures_util::{SinkExt, StreamExt};
use slirc_proto::{IrcCodec, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::config::{self, Config, ConfigError};
use crate::contacts::{ContactEntry, PresenceEvent};
use crate::error::ClientError;
use crate::session::{RegistrationState, Session};
use crate::sink::ChannelSink;

const COMMAND_CHANNEL_SIZE: usize = 32;
const EVENT_CHANNEL_SIZE: usize = 256;

/// Requests accepted by the connection task.
#[derive(Debug)]
pub enum ClientCommand {
    AddContact(String),
    RemoveContact(String),
    Snapshot(oneshot::Sender<Vec<ContactEntry>>),
    Quit(Option<String>),
}

/// Clonable front-end to a running client task.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    commands: mpsc::Sender<ClientCommand>,
    events: broadcast::Sender<PresenceEvent>,
}

impl ClientHandle {
    async fn request(&self, command: ClientCommand) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::Closed)
    }

    pub async fn add_contact(&self, nick: impl Into<String>) -> Result<(), ClientError> {
        self.request(ClientCommand::AddContact(nick.into())).await
    }

    pub async fn remove_contact(&self, nick: impl Into<String>) -> Result<(), ClientError> {
        self.request(ClientCommand::RemoveContact(nick.into())).await
    }

    /// Current state of every contact.
    pub async fn snapshot(&self) -> Result<Vec<ContactEntry>, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.request(ClientCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| ClientError::Closed)
    }

    /// Send QUIT and stop the task.
    pub async fn quit(&self, reason: Option<String>) -> Result<(), ClientError> {
        self.request(ClientCommand::Quit(reason)).await
    }

    /// Status transitions from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PresenceEvent> {
        self.events.subscribe()
    }
}

/// Connect over TCP and spawn the client task.
pub async fn connect(
    config: Config,
) -> Result<(ClientHandle, JoinHandle<Result<(), ClientError>>), ClientError> {
    config::validate(&config).map_err(ConfigError::Invalid)?;
    let address = config.server.address();
    let stream = TcpStream::connect(&address).await?;
    info!(address = %address, "Connected");
    Ok(spawn(stream, config))
}

/// Spawn the client task over an already-connected stream.
///
/// An invalid `config` ends the task at once with [`ClientError::Config`].
pub fn spawn<S>(stream: S, config: Config) -> (ClientHandle, JoinHandle<Result<(), ClientError>>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
    let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
    let handle = ClientHandle {
        commands: commands_tx,
        events: events_tx.clone(),
    };
    let task = tokio::spawn(run(stream, config, commands_rx, events_tx));
    (handle, task)
}

/// Write every queued line and flush.
async fn flush<S>(
    framed: &mut Framed<S, IrcCodec>,
    outgoing: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut wrote = false;
    while let Ok(line) = outgoing.try_recv() {
        framed.feed(line).await?;
        wrote = true;
    }
    if wrote {
        SinkExt::<String>::flush(framed).await?;
    }
    Ok(())
}

/// Drive one connection until the server closes it or a `Quit` arrives.
///
/// Lines that cannot be decoded are skipped; only transport failures end the
/// connection early.
pub async fn run<S>(
    stream: S,
    config: Config,
    mut commands: mpsc::Receiver<ClientCommand>,
    events: broadcast::Sender<PresenceEvent>,
) -> Result<(), ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    config::validate(&config).map_err(ConfigError::Invalid)?;
    let codec = IrcCodec::new().with_encoding(&config.server.encoding)?;

    let (tx, mut outgoing) = mpsc::unbounded_channel();
    let mut framed = Framed::new(stream, codec);
    let mut session = Session::new(&config, ChannelSink::new(tx));
    session.start()?;

    let mut poll_timer = tokio::time::interval(config.presence.poll_interval());
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick fires immediately, we don't want that
    poll_timer.tick().await;

    let result = loop {
        if let Err(e) = flush(&mut framed, &mut outgoing).await {
            break Err(e.into());
        }

        for event in session.drain_events() {
            // No receivers is fine.
            let _ = events.send(event);
        }

        tokio::select! {
            frame = framed.next() => match frame {
                Some(Ok(message)) => {
                    let was_ready = session.registration_state() == RegistrationState::Ready;
                    if let Err(e) = session.handle(message) {
                        warn!(error = %e, code = e.error_code(), "Failed to handle message");
                    }
                    if !was_ready && session.registration_state() == RegistrationState::Ready {
                        framed.codec_mut().set_capabilities(session.capabilities().clone());
                    }
                }
                // Decoding never fails, so this is the transport.
                Some(Err(e)) => {
                    warn!(error = %e, "Read error");
                    break Err(e.into());
                }
                None => {
                    info!("Server closed the connection");
                    break Ok(());
                }
            },

            _ = poll_timer.tick() => {
                if let Err(e) = session.tick() {
                    warn!(error = %e, code = e.error_code(), "Poll failed");
                }
            }

            command = commands.recv() => match command {
                Some(ClientCommand::AddContact(nick)) => {
                    match session.add_contact(&nick) {
                        Ok(added) => debug!(nick = %nick, added, "Add contact"),
                        Err(e) => warn!(nick = %nick, error = %e, "Failed to add contact"),
                    }
                }
                Some(ClientCommand::RemoveContact(nick)) => {
                    match session.remove_contact(&nick) {
                        Ok(removed) => debug!(nick = %nick, removed, "Remove contact"),
                        Err(e) => warn!(nick = %nick, error = %e, "Failed to remove contact"),
                    }
                }
                Some(ClientCommand::Snapshot(reply)) => {
                    let _ = reply.send(session.snapshot());
                }
                Some(ClientCommand::Quit(reason)) => {
                    info!("Quitting");
                    if let Err(e) = session.quit(reason) {
                        warn!(error = %e, "Failed to send QUIT");
                    }
                    break flush(&mut framed, &mut outgoing).await.map_err(Into::into);
                }
                None => {
                    info!("All handles dropped, quitting");
                    let _ = session.quit(None);
                    break flush(&mut framed, &mut outgoing).await.map_err(Into::into);
                }
            },
        }
    };

    session.disconnected();
    for event in session.drain_events() {
        let _ = events.send(event);
    }
    result
}

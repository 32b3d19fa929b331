//! Sans-IO connection state: registration, capability negotiation and
//! routing of inbound messages to the contact list.
//!
//! Nothing here touches a socket. Inbound messages are passed to
//! [`Session::handle`], outbound ones leave through the [`ChannelSink`].

use slirc_proto::{Command, CommandKind, Message, ServerCapabilities};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::contacts::{ContactEntry, ContactList, PresenceEvent};
use crate::error::ClientError;
use crate::presence::StrategyKind;
use crate::router::{Router, Subscriber, SubscriberId};
use crate::sink::{ChannelSink, MessageSink};

const REGISTRATION_INTERESTS: &[CommandKind] = &[
    CommandKind::Ping,
    CommandKind::Welcome,
    CommandKind::Isupport,
    CommandKind::NicknameInUse,
    CommandKind::EndOfMotd,
    CommandKind::NoMotd,
    CommandKind::Error,
];

/// Registration progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    /// NICK/USER sent, waiting for `RPL_WELCOME`.
    Connecting,
    /// Welcomed; collecting `RPL_ISUPPORT` until the MOTD ends.
    Registered,
    /// MOTD done, capabilities final.
    Ready,
}

/// Handles the registration numerics and keepalive.
#[derive(Debug)]
pub struct Registration {
    nick: String,
    state: RegistrationState,
    capabilities: ServerCapabilities,
    became_ready: bool,
}

impl Registration {
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            state: RegistrationState::Connecting,
            capabilities: ServerCapabilities::new(),
            became_ready: false,
        }
    }

    /// Current nickname, as confirmed by the server once welcomed.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// True exactly once, after the MOTD has ended.
    fn take_ready(&mut self) -> bool {
        std::mem::take(&mut self.became_ready)
    }

    fn reply(sink: &dyn MessageSink, message: Message) {
        if let Err(e) = sink.send(message) {
            warn!(error = %e, code = e.error_code(), "Failed to send reply");
        }
    }
}

impl Subscriber for Registration {
    fn interests(&self) -> Vec<CommandKind> {
        REGISTRATION_INTERESTS.to_vec()
    }

    fn notify(&mut self, message: &Message, sink: &dyn MessageSink) {
        match &message.command {
            Command::Ping(ping) => Self::reply(sink, Message::pong(ping.token.clone())),
            Command::Welcome(welcome) => {
                if !welcome.target.is_empty() {
                    self.nick = welcome.target.clone();
                }
                self.state = RegistrationState::Registered;
                info!(nick = %self.nick, "Registered");
            }
            Command::Isupport(isupport) => {
                for token in &isupport.tokens {
                    self.capabilities.apply_token(token);
                }
                debug!(tokens = isupport.tokens.len(), "Absorbed ISUPPORT");
            }
            Command::NicknameInUse(reply) => {
                if self.state == RegistrationState::Connecting {
                    warn!(nick = %reply.nick, "Nickname in use, retrying");
                    self.nick.push('_');
                    Self::reply(sink, Message::nick(self.nick.clone()));
                }
            }
            Command::EndOfMotd(_) | Command::NoMotd(_) => {
                if self.state != RegistrationState::Ready {
                    self.state = RegistrationState::Ready;
                    self.became_ready = true;
                    info!(
                        network = self.capabilities.network().unwrap_or("unknown"),
                        "Server capabilities negotiated"
                    );
                }
            }
            Command::Error(error) => warn!(reason = %error.reason, "Server error"),
            _ => {}
        }
    }
}

/// Everything one connection knows, driven by the client task.
pub struct Session {
    username: String,
    realname: String,
    password: Option<String>,
    sink: ChannelSink,
    router: Router,
    registration: Registration,
    contacts: ContactList,
    contacts_id: SubscriberId,
}

impl Session {
    pub fn new(config: &Config, sink: ChannelSink) -> Self {
        let registration = Registration::new(config.server.nick.clone());
        let contacts = ContactList::new()
            .with_contacts(&config.presence.contacts)
            .with_max_skipped_polls(config.presence.max_skipped_polls);

        let mut router = Router::new();
        // Slot order must match the array built in `handle`.
        let registration_id = router.subscribe(&registration);
        let contacts_id = router.subscribe(&contacts);
        debug_assert_eq!((registration_id.index(), contacts_id.index()), (0, 1));

        Self {
            username: config.server.username().to_owned(),
            realname: config.server.realname.clone(),
            password: config.server.password.clone(),
            sink,
            router,
            registration,
            contacts,
            contacts_id,
        }
    }

    /// Mark the transport up and send the registration burst.
    pub fn start(&mut self) -> Result<(), ClientError> {
        self.sink.set_connected(true);
        if let Some(password) = &self.password {
            self.sink.send(Message::pass(password.clone()))?;
        }
        self.sink.send(Message::nick(self.registration.nick()))?;
        self.sink
            .send(Message::user(self.username.clone(), self.realname.clone()))?;
        Ok(())
    }

    /// Process one inbound message.
    ///
    /// Once the MOTD ends the contact list picks its strategy and the first
    /// poll goes out without waiting for the timer.
    pub fn handle(&mut self, message: Message) -> Result<(), ClientError> {
        if let Command::Unknown(raw) = &message.command {
            debug!(command = raw.command(), "Unhandled message");
        }

        let mut subscribers: [&mut dyn Subscriber; 2] =
            [&mut self.registration, &mut self.contacts];
        self.router.deliver(&message, &mut subscribers, &self.sink);

        if self.registration.take_ready() {
            let caps = self.registration.capabilities().clone();
            self.sink.set_capabilities(caps.clone());
            self.contacts.initialize(&caps, &self.sink)?;
            self.router.resubscribe(self.contacts_id, &self.contacts);
            self.contacts.tick(&self.sink)?;
        }
        Ok(())
    }

    /// Poll timer fired.
    pub fn tick(&mut self) -> Result<(), ClientError> {
        self.contacts.tick(&self.sink)
    }

    pub fn add_contact(&mut self, nick: &str) -> Result<bool, ClientError> {
        self.contacts.add(nick, &self.sink)
    }

    pub fn remove_contact(&mut self, nick: &str) -> Result<bool, ClientError> {
        self.contacts.remove(nick, &self.sink)
    }

    /// Send QUIT and mark the transport down.
    pub fn quit(&mut self, reason: Option<String>) -> Result<(), ClientError> {
        let result = self.sink.send(Message::quit(reason.unwrap_or_default()));
        self.sink.set_connected(false);
        result
    }

    /// The transport went away.
    pub fn disconnected(&mut self) {
        self.sink.set_connected(false);
    }

    pub fn snapshot(&self) -> Vec<ContactEntry> {
        self.contacts.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<PresenceEvent> {
        self.contacts.drain_events()
    }

    pub fn nick(&self) -> &str {
        self.registration.nick()
    }

    pub fn registration_state(&self) -> RegistrationState {
        self.registration.state()
    }

    pub fn strategy(&self) -> Option<StrategyKind> {
        self.contacts.strategy()
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        self.registration.capabilities()
    }
}

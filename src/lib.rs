//! # slirc-presence
//!
//! Tracks whether a set of IRC contacts is online.
//!
//! After registration the server's `RPL_ISUPPORT` tokens decide, once, how:
//! `WATCH` lists if advertised, else `MONITOR` lists, else periodic `ISON`
//! polls where a nickname missing from the reply counts as offline.
//!
//! The protocol work lives in [`slirc_proto`]; this crate holds the contact
//! set, the tracking strategies and the connection task.
//!
//! ```no_run
//! # async fn demo() -> Result<(), slirc_presence::ClientError> {
//! use slirc_presence::{client, Config};
//!
//! let config = Config::load("presence.toml")?;
//! let (handle, task) = client::connect(config).await?;
//! let mut events = handle.subscribe();
//!
//! handle.add_contact("alice").await?;
//! while let Ok(event) = events.recv().await {
//!     println!("{} is {}", event.nick, if event.online { "online" } else { "offline" });
//! }
//! # let _ = task;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod contacts;
pub mod error;
pub mod presence;
pub mod router;
pub mod session;
pub mod sink;

pub use client::{ClientCommand, ClientHandle};
pub use config::Config;
pub use contacts::{ContactBook, ContactEntry, ContactList, PresenceEvent};
pub use error::ClientError;
pub use presence::{PresenceTracker, StrategyKind};
pub use router::{Router, Subscriber};
pub use session::Session;
pub use sink::{ChannelSink, MessageSink};

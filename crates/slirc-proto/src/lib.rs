//! # slirc-proto
//!
//! A sans-IO IRC client protocol library.
//!
//! ## Features
//!
//! - Tokenizer splitting raw lines into prefix, command and parameters
//! - `+`/`-` mode-string codec with parameter threading
//! - A catalog of typed message shapes with explicit precedence for shapes
//!   sharing a command token
//! - A dispatcher decoding lines into [`Message`] and encoding them back to
//!   canonical wire form, with capability validation
//! - `RPL_ISUPPORT` capability accumulation
//! - Optional Tokio codec
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Command, Dispatcher, Message};
//!
//! let dispatcher = Dispatcher::default();
//!
//! let msg = dispatcher.decode(":srv 303 me :alice bob").unwrap();
//! if let Command::IsonReply(reply) = &msg.command {
//!     assert_eq!(reply.nicks, ["alice", "bob"]);
//! }
//!
//! let line = dispatcher.encode(&Message::monitor_add(vec!["carol".into()])).unwrap();
//! assert_eq!(line, "MONITOR + carol");
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod dispatch;
pub mod error;
#[cfg(feature = "tokio")]
pub mod irc;
pub mod isupport;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod schema;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::chan::is_channel_name_with;
pub use self::command::{Command, CommandKind, Variant};
pub use self::dispatch::Dispatcher;
pub use self::error::{CatalogError, MessageError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
pub use self::isupport::ServerCapabilities;
pub use self::message::{tokenize, Message, RawLine};
pub use self::mode::{ChannelMode, ModeAction, ModeChange, UserMode};
pub use self::prefix::Prefix;
pub use self::schema::{Catalog, Schema, Shape};

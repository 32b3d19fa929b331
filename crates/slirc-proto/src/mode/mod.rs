//! The `+`/`-` mode-change mini-language.
//!
//! Mode strings such as `+ov-b` carry a run-length encoded action sign and a
//! sequence of single-character symbols. Parameters for symbols that take
//! them travel as separate message parameters and are threaded in by the
//! owning message.

mod codec;
mod types;

pub use self::codec::{check_params, decode, encode, encode_params};
pub use self::types::{ChannelMode, ModeAction, ModeChange, ModeType, UserMode};

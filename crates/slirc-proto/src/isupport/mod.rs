//! Server capabilities advertised through `RPL_ISUPPORT` (005).
//!
//! # Reference
//! - <https://modern.ircdocs.horse/#rplisupport-005>

mod capabilities;
mod parser;

pub use capabilities::{ServerCapabilities, UNLIMITED};
pub use parser::{parse_token, IsupportEntry};

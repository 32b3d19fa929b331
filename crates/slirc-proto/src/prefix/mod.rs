//! Message source prefixes (`nick!user@host` or a server name).

mod serialize;
mod types;

pub use self::types::Prefix;

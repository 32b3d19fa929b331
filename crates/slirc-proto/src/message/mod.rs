//! Raw lines, the tokenizer and the message envelope.

mod raw;
mod tokenize;
mod types;

pub use self::raw::{RawLine, MAX_PARAMS};
pub use self::tokenize::tokenize;
pub use self::types::Message;

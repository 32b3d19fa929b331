//! IRC message codec for tokio.
//!
//! Splits a byte stream into lines, decodes each line's bytes with the
//! configured character encoding and hands the text to a [`Dispatcher`].

use bytes::BytesMut;
use encoding::{Encoding, UTF_8};
use tokio_util::codec::{Decoder, Encoder};

use crate::dispatch::Dispatcher;
use crate::error::{self, ProtocolError};
use crate::isupport::ServerCapabilities;
use crate::message::Message;

/// Default maximum line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 8191;

/// Tokio codec for encoding/decoding IRC messages.
///
/// Decoding never fails. Lines longer than the limit are dropped, bytes the
/// encoding cannot map become U+FFFD, and lines no schema accepts decode to
/// [`Command::Unknown`](crate::Command::Unknown).
#[derive(Debug)]
pub struct IrcCodec {
    encoding: &'static Encoding,
    dispatcher: Dispatcher,
    max_len: usize,
    /// Index of next byte to check for newline
    next_index: usize,
    /// Inside an over-long line; skip up to its newline.
    discarding: bool,
}

impl Default for IrcCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl IrcCodec {
    /// UTF-8 codec with the standard catalog and [`MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        IrcCodec {
            encoding: UTF_8,
            dispatcher: Dispatcher::default(),
            max_len,
            next_index: 0,
            discarding: false,
        }
    }

    /// Read and write text in the encoding named by `label` (e.g. `latin1`).
    pub fn with_encoding(mut self, label: &str) -> error::Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ProtocolError::UnknownEncoding(label.to_owned()))?;
        Ok(self)
    }

    /// Use `dispatcher` for decoding and [`Message`] encoding.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Decode later lines under `caps` (e.g. an advertised `CHANTYPES`).
    pub fn set_capabilities(&mut self, caps: ServerCapabilities) {
        self.dispatcher.set_capabilities(caps);
    }

    /// Name of the character encoding in use.
    pub fn encoding(&self) -> &'static str {
        self.encoding.name()
    }

    /// Sanitize outgoing line data.
    ///
    /// - Truncates at the first line ending
    /// - Rejects NUL and other control characters except IRC formatting
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }

        for ch in data.chars() {
            if is_illegal_control_char(ch) {
                return Err(ProtocolError::IllegalControlChar(ch));
            }
        }

        Ok(data)
    }

    fn text(&self, raw: &[u8]) -> String {
        let (text, _, _) = self.encoding.decode(raw);
        text.trim_end_matches(['\r', '\n']).to_owned()
    }

    /// Next complete line in `src`, skipping any that exceed the limit.
    fn next_line(&mut self, src: &mut BytesMut) -> Option<String> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                self.next_index = src.len();
                if self.next_index > self.max_len {
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                }
                return None;
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;
            if std::mem::take(&mut self.discarding) || line.len() > self.max_len {
                continue;
            }
            return Some(self.text(&line));
        }
    }
}

/// Control characters allowed in text: bold, colour, hex colour, reset,
/// monospace, reverse, italics, strikethrough, underline, CTCP delimiter.
fn is_illegal_control_char(ch: char) -> bool {
    ch.is_control()
        && !matches!(
            ch,
            '\x01' | '\x02' | '\x03' | '\x04' | '\x0f' | '\x11' | '\x16' | '\x1d' | '\x1e' | '\x1f'
        )
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        while let Some(line) = self.next_line(src) {
            if let Some(msg) = self.dispatcher.decode(&line) {
                return Ok(Some(msg));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        if let Some(msg) = self.decode(src)? {
            return Ok(Some(msg));
        }
        if src.is_empty() {
            return Ok(None);
        }

        // Unterminated last line
        let rest = src.split();
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) || rest.len() > self.max_len {
            return Ok(None);
        }
        let line = self.text(&rest);
        Ok(self.dispatcher.decode(&line))
    }
}

impl Encoder<String> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        let line = Self::sanitize(line)?;
        if line.len() + 2 > self.max_len {
            return Err(ProtocolError::LineTooLong {
                limit: self.max_len,
            });
        }
        let (bytes, _, _) = self.encoding.encode(&line);
        dst.reserve(bytes.len() + 2);
        dst.extend_from_slice(&bytes);
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        let line = self.dispatcher.encode(&msg)?;
        Encoder::<String>::encode(self, line, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandKind};

    #[test]
    fn test_sanitize_truncates_newline() {
        let result = IrcCodec::sanitize("PRIVMSG #test :hello\r\nworld".to_string());
        assert_eq!(result.unwrap(), "PRIVMSG #test :hello");
    }

    #[test]
    fn test_sanitize_rejects_nul() {
        let result = IrcCodec::sanitize("PRIVMSG #test :hel\0lo".to_string());
        assert!(matches!(result, Err(ProtocolError::IllegalControlChar('\0'))));
    }

    #[test]
    fn test_sanitize_keeps_formatting() {
        let result = IrcCodec::sanitize("PRIVMSG #test :\x02bold\x02".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let mut codec = IrcCodec::new();
        let mut buf = BytesMut::from(&b"\r\n   \r\nPING :abc\r\nPART"[..]);
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.kind(), CommandKind::Ping);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        let msg = codec.decode_eof(&mut buf).unwrap().unwrap();
        assert!(matches!(msg.command, Command::Part(_)));
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = IrcCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(Message::nick("alice"), &mut buf).unwrap();
        assert_eq!(&buf[..], b"NICK alice\r\n");
    }

    #[test]
    fn test_long_lines_are_dropped() {
        let mut codec = IrcCodec::with_max_len(16);
        let mut buf = BytesMut::from(&b"PRIVMSG #a :this is far"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b" too long\r\nPING :tok\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.kind(), CommandKind::Ping);
    }

    #[test]
    fn test_encode_rejects_long_lines() {
        let mut codec = IrcCodec::with_max_len(8);
        let mut buf = BytesMut::new();
        assert!(matches!(
            codec.encode("PRIVMSG #a :hi".to_string(), &mut buf),
            Err(ProtocolError::LineTooLong { limit: 8 })
        ));
    }

    #[test]
    fn test_invalid_utf8_does_not_stop_decoding() {
        let mut codec = IrcCodec::new();
        let mut buf = BytesMut::from(&b":x!y@z PRIVMSG watcher :caf\xe9\r\n:srv PING :tok\r\n"[..]);

        let msg = codec.decode(&mut buf).unwrap().unwrap();
        match msg.command {
            Command::Privmsg(m) => assert_eq!(m.text, "caf\u{fffd}"),
            other => panic!("unexpected {:?}", other),
        }
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.kind(), CommandKind::Ping);
    }

    #[test]
    fn test_latin1_round_trip() {
        let mut codec = IrcCodec::new().with_encoding("latin1").unwrap();
        assert_eq!(codec.encoding(), "windows-1252");

        let mut buf = BytesMut::from(&b":x!y@z PRIVMSG watcher :caf\xe9\r\n"[..]);
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        match &msg.command {
            Command::Privmsg(m) => assert_eq!(m.text, "caf\u{e9}"),
            other => panic!("unexpected {:?}", other),
        }

        let mut out = BytesMut::new();
        codec.encode(Message::privmsg("#a", "caf\u{e9}"), &mut out).unwrap();
        assert_eq!(&out[..], b"PRIVMSG #a caf\xe9\r\n");
    }

    #[test]
    fn test_unknown_encoding() {
        assert!(matches!(
            IrcCodec::new().with_encoding("klingon"),
            Err(ProtocolError::UnknownEncoding(_))
        ));
    }
}

//! Connection registration and keepalive shapes.

use crate::error::MessageError;
use crate::message::RawLine;
use crate::schema::Shape;

use super::util::{arg_string, parse_count, push_opt, require};

/// `PASS <password>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pass {
    /// Connection password.
    pub password: String,
}

impl Shape for Pass {
    const TOKEN: &'static str = "PASS";

    fn decode(line: &RawLine) -> Self {
        Pass {
            password: line.arg(0).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("password", &self.password)?;
        Ok(vec![self.password.clone()])
    }
}

/// `NICK <nickname>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nick {
    /// New nickname.
    pub nickname: String,
}

impl Shape for Nick {
    const TOKEN: &'static str = "NICK";

    fn decode(line: &RawLine) -> Self {
        Nick {
            nickname: line.arg(0).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("nickname", &self.nickname)?;
        Ok(vec![self.nickname.clone()])
    }
}

/// `USER <username> <mode> * :<realname>` (RFC 2812 form)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Username (ident).
    pub username: String,
    /// Initial user mode bitmask.
    pub mode: u32,
    /// Real name.
    pub realname: String,
}

impl Shape for User {
    const TOKEN: &'static str = "USER";

    fn decode(line: &RawLine) -> Self {
        User {
            username: line.arg(0).to_owned(),
            mode: parse_count(line.arg(1)),
            realname: line.arg(3).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("username", &self.username)?;
        Ok(vec![
            self.username.clone(),
            self.mode.to_string(),
            "*".to_owned(),
            self.realname.clone(),
        ])
    }
}

/// `QUIT [:<reason>]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Quit {
    /// Quit message; empty when absent.
    pub reason: String,
}

impl Shape for Quit {
    const TOKEN: &'static str = "QUIT";

    fn decode(line: &RawLine) -> Self {
        Quit {
            reason: line.arg(0).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let mut params = Vec::new();
        push_opt(&mut params, &self.reason);
        Ok(params)
    }
}

/// `PING <token>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ping {
    /// Token to echo back.
    pub token: String,
}

impl Shape for Ping {
    const TOKEN: &'static str = "PING";

    fn decode(line: &RawLine) -> Self {
        Ping {
            token: line.arg(0).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("token", &self.token)?;
        Ok(vec![self.token.clone()])
    }
}

/// `PONG [<server>] <token>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pong {
    /// Responding server, empty in client replies.
    pub server: String,
    /// Echoed token.
    pub token: String,
}

impl Shape for Pong {
    const TOKEN: &'static str = "PONG";

    fn decode(line: &RawLine) -> Self {
        if line.len() >= 2 {
            Pong {
                server: line.arg(0).to_owned(),
                token: line.arg(1).to_owned(),
            }
        } else {
            Pong {
                server: String::new(),
                token: line.arg(0).to_owned(),
            }
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("token", &self.token)?;
        let mut params = Vec::with_capacity(2);
        push_opt(&mut params, &self.server);
        params.push(self.token.clone());
        Ok(params)
    }
}

/// `ERROR :<reason>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    /// Why the server is closing the link.
    pub reason: String,
}

impl Shape for Error {
    const TOKEN: &'static str = "ERROR";

    fn decode(line: &RawLine) -> Self {
        Error {
            reason: arg_string(line.params(), 0),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        Ok(vec![self.reason.clone()])
    }
}

//! Nom-based tokenizer for raw protocol lines.
//!
//! ```text
//! [":" prefix SP] command *( SP middle ) [SP ":" trailing]
//! ```

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, space1},
    sequence::{preceded, terminated},
    IResult,
};

use super::raw::{RawLine, MAX_PARAMS};

/// Parse the source prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char(':'), take_while(|c| c != ' ')), space1)(input)
}

/// Parse the command word or numeric.
fn parse_command(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c != ' ')(input)
}

fn parse_head(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    let (input, prefix) = if input.starts_with(':') {
        let (input, prefix) = parse_prefix(input)?;
        (input, Some(prefix))
    } else {
        (input, None)
    };
    let (input, command) = parse_command(input)?;
    Ok((input, (prefix, command)))
}

/// Split the text after the command into parameters.
///
/// Runs of spaces separate parameters. The first word starting with `:`
/// takes the rest of the line verbatim. Once 14 parameters are collected the
/// remainder becomes the 15th, as RFC 2812 allows the trailing colon to be
/// omitted there.
fn parse_params(mut rest: &str) -> Vec<String> {
    let mut params = Vec::new();

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing.to_owned());
            break;
        }

        if params.len() == MAX_PARAMS - 1 {
            params.push(rest.to_owned());
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(rest[..end].to_owned());
        rest = &rest[end..];
    }

    params
}

/// Tokenize one raw line.
///
/// Surrounding whitespace (including the line terminator) is trimmed first.
/// Input without a command yields the empty sentinel [`RawLine`].
pub fn tokenize(line: &str) -> RawLine {
    let line = line.trim();
    if line.is_empty() {
        return RawLine::default();
    }

    match parse_head(line) {
        Ok((rest, (prefix, command))) => RawLine::new(prefix, command, parse_params(rest)),
        Err(_) => RawLine::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_command() {
        let line = tokenize("PING");
        assert_eq!(line.command(), "PING");
        assert!(line.prefix().is_none());
        assert!(line.params().is_empty());
    }

    #[test]
    fn test_prefix_and_trailing() {
        let line = tokenize(":nick!user@host PRIVMSG #channel :Hello, world!");
        assert_eq!(line.prefix(), Some("nick!user@host"));
        assert_eq!(line.command(), "PRIVMSG");
        assert_eq!(line.params(), &["#channel", "Hello, world!"]);
    }

    #[test]
    fn test_trims_line_terminator_and_whitespace() {
        let line = tokenize("  PING :server\r\n");
        assert_eq!(line.command(), "PING");
        assert_eq!(line.params(), &["server"]);
    }

    #[test]
    fn test_runs_of_spaces_collapse() {
        let line = tokenize("USER   guest  0 *   :Real   Name");
        assert_eq!(line.params(), &["guest", "0", "*", "Real   Name"]);
    }

    #[test]
    fn test_trailing_keeps_embedded_colons() {
        let line = tokenize("PRIVMSG #a :: see :this");
        assert_eq!(line.params(), &["#a", ": see :this"]);
    }

    #[test]
    fn test_empty_trailing() {
        let line = tokenize("TOPIC #channel :");
        assert_eq!(line.params(), &["#channel", ""]);
    }

    #[test]
    fn test_numeric_reply() {
        let line = tokenize(":irc.example.net 303 me :alice bob");
        assert!(line.is_numeric());
        assert_eq!(line.params(), &["me", "alice bob"]);
    }

    #[test]
    fn test_fifteenth_param_absorbs_remainder() {
        let line = tokenize("CMD p1 p2 p3 p4 p5 p6 p7 p8 p9 p10 p11 p12 p13 p14 p15 p16");
        assert_eq!(line.len(), 15);
        assert_eq!(line.arg(14), "p15 p16");
    }

    #[test]
    fn test_malformed_lines_yield_sentinel() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \r\n").is_empty());
        assert!(tokenize(":prefix-only").is_empty());
        assert!(tokenize(":prefix   ").is_empty());
    }
}

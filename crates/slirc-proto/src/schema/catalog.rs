//! The ordered schema table.

use std::collections::HashMap;

use crate::command::{self, CommandKind};
use crate::error::CatalogError;
use crate::isupport::ServerCapabilities;
use crate::message::{tokenize, RawLine};

use super::Schema;

/// Ordered set of schemas.
///
/// Schemas sharing a command token are tried in registration order and the
/// first whose predicate accepts the line wins, so more specific predicates
/// must be registered first. [`Catalog::check_corpus`] verifies that no line
/// in a corpus is accepted by two schemas.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    schemas: Vec<Schema>,
    by_token: HashMap<String, Vec<usize>>,
    by_kind: HashMap<CommandKind, usize>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in shape, in precedence order.
    pub fn standard_schemas() -> Vec<Schema> {
        use command::*;

        vec![
            Schema::of::<Pass>(),
            Schema::of::<Nick>(),
            Schema::of::<User>(),
            Schema::of::<Quit>(),
            Schema::of::<Ping>(),
            Schema::of::<Pong>(),
            Schema::of::<Error>(),
            Schema::of::<Join>(),
            Schema::of::<Part>(),
            Schema::of::<Topic>(),
            Schema::of::<Kick>(),
            Schema::of::<Invite>(),
            Schema::of::<Knock>(),
            Schema::of::<Names>(),
            // LIST: sigil-led filter before the plain channel form.
            Schema::of::<ListFilter>(),
            Schema::of::<List>(),
            // MODE: channel target before user target.
            Schema::of::<ChannelModeChange>(),
            Schema::of::<UserModeChange>(),
            Schema::of::<Privmsg>(),
            Schema::of::<Notice>(),
            Schema::of::<Whisper>(),
            Schema::of::<Away>(),
            Schema::of::<Who>(),
            Schema::of::<Whois>(),
            Schema::of::<Ison>(),
            Schema::of::<Prop>(),
            // WATCH: signed edit first, then the single-letter queries.
            Schema::of::<WatchEdit>(),
            Schema::of::<WatchClear>(),
            Schema::of::<WatchStatus>(),
            Schema::of::<WatchList>(),
            Schema::of::<MonitorAdd>(),
            Schema::of::<MonitorRemove>(),
            Schema::of::<MonitorClear>(),
            Schema::of::<MonitorList>(),
            Schema::of::<MonitorStatus>(),
            Schema::of::<Welcome>(),
            Schema::of::<Isupport>(),
            Schema::of::<AwayReply>(),
            Schema::of::<IsonReply>(),
            Schema::of::<ListItem>(),
            Schema::of::<ListEnd>(),
            Schema::of::<TopicReply>(),
            Schema::of::<NamesReply>(),
            Schema::of::<EndOfNames>(),
            Schema::of::<EndOfMotd>(),
            Schema::of::<NoSuchNick>(),
            Schema::of::<NoMotd>(),
            Schema::of::<NicknameInUse>(),
            Schema::of::<TooManyWatch>(),
            Schema::of::<WatchLogon>(),
            Schema::of::<WatchLogoff>(),
            Schema::of::<WatchStopped>(),
            Schema::of::<WatchNowOn>(),
            Schema::of::<WatchNowOff>(),
            Schema::of::<MonOnline>(),
            Schema::of::<MonOffline>(),
            Schema::of::<MonList>(),
            Schema::of::<EndOfMonList>(),
            Schema::of::<MonListFull>(),
            Schema::of::<PropReply>(),
            Schema::of::<PropEnd>(),
        ]
    }

    /// The built-in catalog.
    ///
    /// Its kinds are unique; the test suite checks it through
    /// [`Catalog::from_schemas`].
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for schema in Self::standard_schemas() {
            catalog.insert(schema);
        }
        catalog
    }

    /// Build a catalog, rejecting duplicate variants.
    pub fn from_schemas<I>(schemas: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Schema>,
    {
        let mut catalog = Self::new();
        for schema in schemas {
            catalog.register(schema)?;
        }
        Ok(catalog)
    }

    /// Append `schema` at the lowest precedence for its token.
    pub fn register(&mut self, schema: Schema) -> Result<(), CatalogError> {
        if self.by_kind.contains_key(&schema.kind()) {
            return Err(CatalogError::DuplicateKind(schema.kind()));
        }
        self.insert(schema);
        Ok(())
    }

    fn insert(&mut self, schema: Schema) {
        let index = self.schemas.len();
        self.by_token
            .entry(schema.token().to_ascii_uppercase())
            .or_default()
            .push(index);
        self.by_kind.insert(schema.kind(), index);
        self.schemas.push(schema);
    }

    /// First schema, by precedence, that matches `line`.
    pub fn select(&self, line: &RawLine, caps: &ServerCapabilities) -> Option<&Schema> {
        self.candidates(line).find(|schema| schema.matches(line, caps))
    }

    fn candidates<'a>(&'a self, line: &RawLine) -> impl Iterator<Item = &'a Schema> + 'a {
        self.by_token
            .get(&line.command().to_ascii_uppercase())
            .into_iter()
            .flatten()
            .map(|&i| &self.schemas[i])
    }

    /// Schema producing `kind`.
    pub fn schema_for(&self, kind: CommandKind) -> Option<&Schema> {
        self.by_kind.get(&kind).map(|&i| &self.schemas[i])
    }

    /// Variants sharing `token`, in precedence order.
    pub fn precedence(&self, token: &str) -> Vec<CommandKind> {
        self.by_token
            .get(&token.to_ascii_uppercase())
            .map(|indices| indices.iter().map(|&i| self.schemas[i].kind()).collect())
            .unwrap_or_default()
    }

    /// Check that every line in `corpus` is accepted by at most one schema,
    /// under default capabilities.
    pub fn check_corpus<'a, I>(&self, corpus: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.check_corpus_with(corpus, &ServerCapabilities::new())
    }

    /// [`Catalog::check_corpus`] under `caps`.
    pub fn check_corpus_with<'a, I>(
        &self,
        corpus: I,
        caps: &ServerCapabilities,
    ) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in corpus {
            let line = tokenize(text);
            let mut accepted = self.candidates(&line).filter(|s| s.matches(&line, caps));
            if let (Some(first), Some(second)) = (accepted.next(), accepted.next()) {
                return Err(CatalogError::Ambiguous {
                    line: text.to_owned(),
                    first: first.kind(),
                    second: second.kind(),
                });
            }
        }
        Ok(())
    }

    /// Number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }
}

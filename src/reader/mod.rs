//! Trace reader
//!
//! A [`Reader`] moves through three states:
//!
//! - **HeaderParsing**: `$...$end` records are read one at a time. Scopes
//!   build up the module path, `$var` records fill the [`Catalog`], metadata
//!   records are kept in [`HeaderInfo`]. `$enddefinitions` ends the header.
//!   Unknown records are logged and skipped. Input that does not start with
//!   `$` is left in place and treated as the start of the body.
//! - **BodyStreaming**: one line at a time. `#<n>` moves the time cursor,
//!   `<token> <id>` lines are decoded into [`Event`]s. Lines that cannot be
//!   decoded are logged and skipped.
//! - **Exhausted**: the source is drained.
//!
//! Use [`Reader::next_event`] (or the `Iterator` impl) for incremental
//! consumption, or [`Reader::read_all`] to build a [`Trace`].

mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::catalog::{Catalog, IdCode};
use crate::config::Timescale;
use crate::error::{Result, ResultExt, VcdError};
use crate::trace::Trace;
use crate::types::{qualify, Event, ReadValue, VarType, Variable};

use tokenizer::{HeaderItem, Tokenizer};

/// Lines in the body that carry no value change
const BODY_KEYWORDS: [&str; 5] = ["$dumpvars", "$dumpall", "$dumpon", "$dumpoff", "$end"];

/// State of the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReaderState {
    #[default]
    HeaderParsing,
    BodyStreaming,
    Exhausted,
}

/// Free-text metadata from the header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub date: Option<String>,
    pub version: Option<String>,
    pub comments: Vec<String>,
    /// Parsed timescale, `None` if absent or unparseable
    pub timescale: Option<Timescale>,
    /// Timescale text as written
    pub timescale_text: Option<String>,
}

/// Streaming reader for one trace
#[derive(Debug)]
pub struct Reader<R> {
    tokens: Tokenizer<R>,
    state: ReaderState,
    header: HeaderInfo,
    catalog: Catalog,
    scope: Vec<String>,
    current_time: u64,
    line_buf: Vec<u8>,
}

impl Reader<BufReader<File>> {
    /// Open a trace file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open trace file {:?}", path))?;
        tracing::info!("Opened trace file: {:?}", path);
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(source: R) -> Self {
        Self {
            tokens: Tokenizer::new(source),
            state: ReaderState::HeaderParsing,
            header: HeaderInfo::default(),
            catalog: Catalog::new(),
            scope: Vec::new(),
            current_time: 0,
            line_buf: Vec::new(),
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    pub fn date(&self) -> Option<&str> {
        self.header.date.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.header.version.as_deref()
    }

    pub fn comments(&self) -> &[String] {
        &self.header.comments
    }

    pub fn timescale(&self) -> Option<Timescale> {
        self.header.timescale
    }

    /// Variables discovered so far
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Time of the last marker read
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// Parse header records until the body starts. No-op once past the header.
    pub fn parse_header(&mut self) -> Result<()> {
        while self.state == ReaderState::HeaderParsing {
            match self.tokens.next_header_item()? {
                HeaderItem::Record(tokens) => self.apply_record(tokens),
                HeaderItem::Body => {
                    tracing::warn!("Body data before $enddefinitions, starting body early");
                    self.enter_body();
                }
                HeaderItem::Eof => {
                    tracing::debug!("End of input while parsing header");
                    self.enter_body();
                }
            }
        }
        Ok(())
    }

    /// Read the next value change, parsing the header first if needed.
    ///
    /// Returns `Ok(None)` once the source is drained.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        self.parse_header()?;

        while self.state == ReaderState::BodyStreaming {
            let Some(line) = self.tokens.next_line(&mut self.line_buf)? else {
                tracing::debug!("Reader exhausted at time {}", self.current_time);
                self.state = ReaderState::Exhausted;
                break;
            };
            if let Some(event) = self.parse_body_line(&line) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Drain the body into per-variable histories keyed by qualified name
    pub fn read_all(&mut self) -> Result<Trace> {
        self.parse_header()?;

        let mut histories: BTreeMap<String, Vec<ReadValue>> = self
            .catalog
            .variables()
            .map(|v| (v.name.clone(), Vec::new()))
            .collect();

        while let Some(event) = self.next_event()? {
            for name in self.catalog.names_for_id(event.id.as_str()) {
                if let Some(history) = histories.get_mut(name) {
                    history.push(ReadValue {
                        time: event.time,
                        value: event.value.clone(),
                    });
                }
            }
        }

        Ok(Trace {
            header: self.header.clone(),
            variables: self.catalog.variables().cloned().collect(),
            histories,
        })
    }

    fn enter_body(&mut self) {
        if !self.scope.is_empty() {
            tracing::warn!("Header ended with {} unclosed scope(s)", self.scope.len());
        }
        tracing::debug!(
            "Header parsed: {} variables, entering body",
            self.catalog.len()
        );
        self.state = ReaderState::BodyStreaming;
    }

    fn apply_record(&mut self, tokens: Vec<String>) {
        let Some(keyword) = tokens.first() else {
            return;
        };
        let args = &tokens[1..];

        match keyword.as_str() {
            "$scope" => match args.last() {
                Some(name) => {
                    tracing::debug!("Entering scope {}", name);
                    self.scope.push(name.clone());
                }
                None => tracing::warn!("Skipping $scope record without a name"),
            },
            "$upscope" => {
                if self.scope.pop().is_none() {
                    tracing::warn!("$upscope without an open scope");
                }
            }
            "$comment" => self.header.comments.push(args.join(" ")),
            "$date" => self.header.date = Some(args.join(" ")),
            "$version" => self.header.version = Some(args.join(" ")),
            "$timescale" => {
                let text = args.join(" ");
                match text.parse::<Timescale>() {
                    Ok(ts) => self.header.timescale = Some(ts),
                    Err(e) => tracing::warn!("Keeping unparsed timescale {:?}: {}", text, e),
                }
                self.header.timescale_text = Some(text);
            }
            "$var" => self.apply_var(args),
            "$enddefinitions" => self.enter_body(),
            other => tracing::warn!("Unknown header: {}", other),
        }
    }

    /// `$var <type> <width> <id> <name> [range] $end`
    fn apply_var(&mut self, args: &[String]) {
        let [type_name, width, id, name, ..] = args else {
            tracing::warn!("Skipping short $var record: {:?}", args);
            return;
        };
        let var_type = match type_name.parse::<VarType>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping declaration of {}: {}", name, e);
                return;
            }
        };
        let Ok(width) = width.parse::<u32>() else {
            tracing::warn!("Skipping declaration of {}: bad width {:?}", name, width);
            return;
        };

        let variable = Variable {
            name: qualify(&self.scope.join("."), name),
            var_type,
            width,
            id: IdCode::new(id.as_str()),
        };
        tracing::debug!("Declared {} as {} ({})", variable.name, variable.id, var_type);
        let qualified = variable.name.clone();
        if !self.catalog.insert(variable) {
            tracing::warn!("Skipping duplicate declaration of {}", qualified);
        }
    }

    fn parse_body_line(&mut self, line: &str) -> Option<Event> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(time) = line.strip_prefix('#') {
            match time.parse::<u64>() {
                Ok(t) => self.current_time = t,
                Err(_) => tracing::warn!("Skipping bad time marker {:?}", line),
            }
            return None;
        }

        if line.starts_with('$') {
            let keyword = line.split_whitespace().next().unwrap_or(line);
            if !BODY_KEYWORDS.contains(&keyword) {
                tracing::warn!("Skipping body record {:?}", line);
            }
            return None;
        }

        let mut parts = line.split_whitespace();
        let (token, id) = match (parts.next(), parts.next()) {
            (Some(token), Some(id)) => (token.to_string(), id),
            // Single-bit scalar change: value char then identifier, no space
            (Some(scalar), None) => match scalar.char_indices().nth(1) {
                Some((split, _)) if "01xzXZ".contains(&scalar[..split]) => {
                    (format!("b{}", &scalar[..split]), &scalar[split..])
                }
                _ => {
                    tracing::warn!("Skipping unrecognised line {:?}", line);
                    return None;
                }
            },
            _ => return None,
        };

        let Some(codec) = self.catalog.codec_for_id(id) else {
            tracing::warn!("{}", VcdError::UnknownVariable(id.to_string()));
            return None;
        };
        match codec.decode(&token) {
            Ok(value) => Some(Event {
                time: self.current_time,
                id: IdCode::new(id),
                value,
            }),
            Err(source) => {
                let err = VcdError::DecodingFailed {
                    identifier: id.to_string(),
                    source,
                };
                tracing::warn!("Skipping line {:?}: {}", line, err);
                None
            }
        }
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

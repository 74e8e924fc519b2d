//! Whitespace tokenizer over a buffered source.
//!
//! Header records are `$keyword tokens... $end` and may span lines; body
//! records are one per line. The tokenizer peeks at the next non-blank
//! byte before consuming a record so the reader can hand a body line back
//! to the line reader untouched.

use std::io::{self, BufRead};

use crate::error::{Result, VcdError};

/// What sits at the current position of the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderItem {
    /// A complete record, keyword first, `$end` stripped
    Record(Vec<String>),
    /// Next input does not start with `$`; nothing was consumed
    Body,
    /// Source exhausted between records
    Eof,
}

#[derive(Debug)]
pub struct Tokenizer<R> {
    source: R,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Read the next header record, or report that the body starts here
    pub fn next_header_item(&mut self) -> Result<HeaderItem> {
        match self.peek_non_blank()? {
            None => return Ok(HeaderItem::Eof),
            Some(b'$') => {}
            Some(_) => return Ok(HeaderItem::Body),
        }

        let mut tokens = Vec::new();
        loop {
            match self.read_word()? {
                Some(word) if word == "$end" => break,
                Some(word) => tokens.push(word),
                None => {
                    return Err(VcdError::MalformedHeader(format!(
                        "missing $end after {}",
                        tokens.first().map_or("record", String::as_str)
                    )))
                }
            }
        }
        Ok(HeaderItem::Record(tokens))
    }

    /// Read one body line without its terminator; `None` at end of input
    pub fn next_line(&mut self, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
        buf.clear();
        if self.source.read_until(b'\n', buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(buf).trim_end().to_string()))
    }

    /// Skip whitespace and return the next byte without consuming it
    fn peek_non_blank(&mut self) -> io::Result<Option<u8>> {
        loop {
            let buf = self.source.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            let blanks = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            if blanks < buf.len() {
                let next = buf[blanks];
                self.source.consume(blanks);
                return Ok(Some(next));
            }
            let len = buf.len();
            self.source.consume(len);
        }
    }

    fn read_word(&mut self) -> io::Result<Option<String>> {
        if self.peek_non_blank()?.is_none() {
            return Ok(None);
        }
        let mut word = Vec::new();
        loop {
            let buf = self.source.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let len = buf.iter().take_while(|b| !b.is_ascii_whitespace()).count();
            word.extend_from_slice(&buf[..len]);
            let done = len < buf.len();
            self.source.consume(len);
            if done {
                break;
            }
        }
        Ok(Some(String::from_utf8_lossy(&word).into_owned()))
    }
}

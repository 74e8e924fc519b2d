//! Trace writer
//!
//! A [`Writer`] owns one output sink and the variable catalog. The header
//! (date, version, comments, timescale, scopes and declarations) is written
//! as calls arrive; `$enddefinitions` is written once, just before the
//! first time marker, which closes the header for good.
//!
//! ```text
//! $date ... $end
//! $timescale 10ps $end
//! $scope module logic $end
//! $var wire 1 ! cs $end
//! $upscope $end
//! $enddefinitions $end
//! #0
//! b1 !
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::catalog::{Catalog, IdCode};
use crate::codec::Encoded;
use crate::config::WriterConfig;
use crate::error::{Result, ResultExt, VcdError};
use crate::types::VariableDecl;

/// Streaming writer for one trace
#[derive(Debug)]
pub struct Writer<W: Write> {
    sink: W,
    catalog: Catalog,
    /// Time of the last marker written, `None` before the first one
    last_time: Option<u64>,
    header_finalized: bool,
    events_written: u64,
}

impl Writer<BufWriter<File>> {
    /// Create (or truncate) a trace file and write its header preamble
    pub fn create(path: impl AsRef<Path>, config: &WriterConfig) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("Failed to create trace file {:?}", path))?;
        tracing::info!("Created trace file: {:?}", path);
        Self::new(BufWriter::new(file), config)
    }
}

impl<W: Write> Writer<W> {
    /// Wrap a sink and write the metadata records from `config`
    pub fn new(sink: W, config: &WriterConfig) -> Result<Self> {
        let mut writer = Self {
            sink,
            catalog: Catalog::new(),
            last_time: None,
            header_finalized: false,
            events_written: 0,
        };

        if let Some(date) = config.date_text() {
            writer.write_text_record("$date", &date)?;
        }
        if let Some(version) = &config.version {
            writer.write_text_record("$version", version)?;
        }
        for comment in &config.comments {
            writer.write_text_record("$comment", comment)?;
        }
        writeln!(writer.sink, "$timescale {} $end", config.timescale)?;
        writer.sink.flush()?;

        Ok(writer)
    }

    /// Add a `$comment` record to the header
    pub fn set_comment(&mut self, comment: &str) -> Result<&mut Self> {
        self.ensure_header_open()?;
        self.write_text_record("$comment", comment)?;
        Ok(self)
    }

    /// Add a `$version` record to the header
    pub fn set_version(&mut self, version: &str) -> Result<&mut Self> {
        self.ensure_header_open()?;
        self.write_text_record("$version", version)?;
        Ok(self)
    }

    /// Declare variables under a dot-joined scope path.
    ///
    /// All declarations are validated before anything is written. Returns
    /// the identifiers assigned, in declaration order.
    pub fn register(&mut self, scope_path: &str, decls: &[VariableDecl]) -> Result<Vec<IdCode>> {
        self.ensure_header_open()?;
        let validated = self.catalog.validate(scope_path, decls)?;

        let segments: Vec<&str> = scope_path.split('.').filter(|s| !s.is_empty()).collect();
        for segment in &segments {
            writeln!(self.sink, "$scope module {} $end", segment)?;
        }

        let mut ids = Vec::with_capacity(validated.len());
        for (decl, source) in validated.into_iter().zip(decls) {
            let var = self.catalog.bind(decl);
            writeln!(
                self.sink,
                "$var {} {} {} {} $end",
                var.var_type, var.width, var.id, source.name
            )?;
            tracing::debug!("Registered {} as {} ({})", var.name, var.id, var.var_type);
            ids.push(var.id.clone());
        }

        for _ in &segments {
            writeln!(self.sink, "$upscope $end")?;
        }
        Ok(ids)
    }

    /// Record a value change for a registered variable at `time`.
    ///
    /// Repeated empty strings on a `string` variable are dropped silently.
    /// The value is encoded before the time marker is written, so a rejected
    /// value leaves neither a marker nor a record behind.
    pub fn set_value(&mut self, time: u64, value: &str, variable: &str) -> Result<()> {
        if self.catalog.get(variable).is_none() {
            return Err(VcdError::UnknownVariable(variable.to_string()));
        }
        self.check_monotonic(time)?;

        let entry = self
            .catalog
            .entry_mut(variable)
            .ok_or_else(|| VcdError::UnknownVariable(variable.to_string()))?;
        let encoded = entry
            .codec
            .encode(value)
            .map_err(|source| VcdError::EncodingFailed {
                variable: variable.to_string(),
                source,
            })?;
        let id = entry.variable.id.clone();

        self.advance_time(time)?;
        match encoded {
            Encoded::Token(token) => {
                writeln!(self.sink, "{} {}", token, id)?;
                self.events_written += 1;
                tracing::trace!("#{} {} = {}", time, variable, token);
            }
            Encoded::Duplicate => {
                tracing::trace!("#{} {} unchanged empty string skipped", time, variable);
            }
        }
        Ok(())
    }

    /// Write a bare time marker, e.g. to mark the end of a simulation
    pub fn set_timestamp(&mut self, time: u64) -> Result<()> {
        self.check_monotonic(time)?;
        self.advance_time(time)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Time of the most recent marker
    pub fn last_time(&self) -> Option<u64> {
        self.last_time
    }

    /// Number of value-change records written
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    pub fn is_header_finalized(&self) -> bool {
        self.header_finalized
    }

    /// Finish the header if needed, flush, and release the sink
    pub fn close(self) -> Result<()> {
        self.into_inner().map(drop)
    }

    /// Like [`close`](Self::close) but hands the flushed sink back
    pub fn into_inner(mut self) -> Result<W> {
        self.finalize_header()?;
        self.sink.flush()?;
        tracing::info!("Trace writer closed after {} events", self.events_written);
        Ok(self.sink)
    }

    fn check_monotonic(&self, time: u64) -> Result<()> {
        match self.last_time {
            Some(last) if time < last => Err(VcdError::NonMonotonicTime { time, last }),
            _ => Ok(()),
        }
    }

    fn advance_time(&mut self, time: u64) -> Result<()> {
        self.finalize_header()?;
        if self.last_time != Some(time) {
            writeln!(self.sink, "#{}", time)?;
            self.last_time = Some(time);
        }
        Ok(())
    }

    fn finalize_header(&mut self) -> Result<()> {
        if !self.header_finalized {
            writeln!(self.sink, "$enddefinitions $end")?;
            self.header_finalized = true;
        }
        Ok(())
    }

    fn ensure_header_open(&self) -> Result<()> {
        if self.header_finalized {
            return Err(VcdError::HeaderFinalized);
        }
        Ok(())
    }

    fn write_text_record(&mut self, keyword: &str, text: &str) -> Result<()> {
        write!(self.sink, "{}\n\t{}\n$end\n", keyword, text)?;
        Ok(())
    }
}
